//! "Llibre A" layout: rows keyed by an inventory id that increments across
//! the whole book. Most bands stack two fields, one above the other.

use std::sync::LazyLock;

use super::shape::Shape;
use super::vocab::TOTALS_KEYWORDS;
use super::{
    AnchorRule, ColumnDefinition, ColumnKind, CombinePolicy, DocumentFamily, FamilyProfile,
    IdentityRecipe, Slot, TotalsRule, XRange,
};

pub const ID: &str = "ID";
pub const CLASSIFICACIO: &str = "CLASSIFICACIÓ";
pub const N_BE: &str = "N.BÉ";
pub const QUANT: &str = "QUANT.";
pub const DESCRIPCIO: &str = "DESCRIPCIÓ";
pub const C_GESTO: &str = "C.GESTO";
pub const C_COST: &str = "C.COST";
pub const T_ADQUISICIO: &str = "T.ADQUISICIÓ";
pub const COST_ADQUI: &str = "COST ADQUI.";
pub const D_ALTA: &str = "D-ALTA";
pub const CENTRE: &str = "CENTRE";
pub const UBICACIO: &str = "UBICACIÓ";
pub const PLANTA: &str = "PLANTA";
pub const ESPAI: &str = "ESPAI";
pub const VBC: &str = "V.B.C";
pub const DOT_AMORT: &str = "DOT. AMORT";
pub const FA: &str = "F.A";
pub const VC: &str = "V.C.";

fn stacked(upper: Slot, lower: Slot) -> ColumnKind {
    ColumnKind::Stacked {
        slots: vec![upper, lower],
        absorb_last: false,
    }
}

pub static PROFILE: LazyLock<FamilyProfile> = LazyLock::new(|| FamilyProfile {
    family: DocumentFamily::LlibreA,
    description: "Llibre A: rows keyed by incremental inventory id, whole document",
    headers: vec![
        ID,
        CLASSIFICACIO,
        N_BE,
        QUANT,
        DESCRIPCIO,
        C_GESTO,
        C_COST,
        T_ADQUISICIO,
        COST_ADQUI,
        D_ALTA,
        CENTRE,
        UBICACIO,
        PLANTA,
        ESPAI,
        VBC,
        DOT_AMORT,
        FA,
        VC,
    ],
    identity_field: ID,
    identity_shape: Shape::Integer,
    // The id column sits left of the classification code, which is numeric too.
    anchor: AnchorRule {
        shape: Shape::Integer,
        x_band: Some(XRange::new(0.0, 1.5)),
    },
    columns: vec![
        ColumnDefinition {
            name: "COL_2_CLASSIFICACIO",
            x_range: XRange::new(1.5, 3.0),
            kind: ColumnKind::Single {
                field: CLASSIFICACIO,
                shape: Shape::exact_digits(6),
            },
        },
        ColumnDefinition {
            name: "COL_3_N_BE",
            x_range: XRange::new(3.0, 4.5),
            kind: ColumnKind::Single {
                field: N_BE,
                shape: Shape::Integer,
            },
        },
        ColumnDefinition {
            name: "COL_4_5_QUANT_DESCRIPCIO",
            x_range: XRange::new(4.5, 8.0),
            kind: ColumnKind::Stacked {
                slots: vec![Slot::shaped(QUANT, Shape::Quantity), Slot::any(DESCRIPCIO)],
                absorb_last: true,
            },
        },
        ColumnDefinition {
            name: "COL_6_7_CGESTO_CCOST",
            x_range: XRange::new(8.0, 9.5),
            kind: stacked(Slot::any(C_GESTO), Slot::any(C_COST)),
        },
        ColumnDefinition {
            name: "COL_8_T_ADQUISICIO",
            x_range: XRange::new(9.5, 11.0),
            kind: ColumnKind::FreeText {
                field: T_ADQUISICIO,
            },
        },
        ColumnDefinition {
            name: "COL_9_10_COSTADQUI_DALTA",
            x_range: XRange::new(11.0, 13.0),
            kind: stacked(
                Slot::shaped(COST_ADQUI, Shape::GroupedAmount),
                Slot::shaped(D_ALTA, Shape::Date),
            ),
        },
        ColumnDefinition {
            name: "COL_11_12_CENTRE_UBICACIO",
            x_range: XRange::new(13.0, 15.0),
            kind: stacked(Slot::any(CENTRE), Slot::any(UBICACIO)),
        },
        ColumnDefinition {
            name: "COL_13_14_PLANTA_ESPAI",
            x_range: XRange::new(15.0, 16.5),
            kind: stacked(Slot::any(PLANTA), Slot::any(ESPAI)),
        },
        ColumnDefinition {
            name: "COL_15_16_VBC_DOTAMORT",
            x_range: XRange::new(16.5, 18.0),
            kind: stacked(Slot::any(VBC), Slot::any(DOT_AMORT)),
        },
        ColumnDefinition {
            name: "COL_17_18_FA_VC",
            x_range: XRange::new(18.0, 20.0),
            kind: stacked(Slot::any(FA), Slot::any(VC)),
        },
    ],
    repairs: vec![],
    completions: vec![],
    totals: TotalsRule {
        fields: vec![DESCRIPCIO, T_ADQUISICIO, CENTRE],
        keywords: TOTALS_KEYWORDS,
    },
    identity: IdentityRecipe {
        date_field: D_ALTA,
        number_field: N_BE,
    },
    combine: CombinePolicy::SortById,
    pooled: true,
    amount_fields: vec![COST_ADQUI, VBC, VC],
});
