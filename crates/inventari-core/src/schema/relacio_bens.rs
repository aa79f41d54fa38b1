//! "Relació de béns" layout: one row per 6-digit classification code,
//! eight overlapping column bands, parsed page by page.

use std::sync::LazyLock;

use super::shape::Shape;
use super::vocab::{
    MatchMode, ACQUISITION_TYPES, LEGAL_NATURE, PATRIMONIAL_STATUS, TOTALS_KEYWORDS, USAGE_TYPES,
};
use super::{
    AnchorRule, ColumnDefinition, ColumnKind, CombinePolicy, DocumentFamily, EnumChoice,
    FamilyProfile, IdentityRecipe, KeywordAction, KeywordRule, RepairRule, Slot, TotalsRule,
    XRange,
};

pub const CLASSIFICACIO: &str = "CLASSIFICACIÓ";
pub const N_BE: &str = "N. BÉ";
pub const ETIQUETA: &str = "ETIQUETA";
pub const D_ALTA: &str = "D- ALTA";
pub const QUANT: &str = "QUANT";
pub const DESCRIPCIO: &str = "DESCRIPCIÓ";
pub const C_GESTOR: &str = "C. GESTOR";
pub const C_COST: &str = "C. COST";
pub const TITULAR: &str = "TITULAR";
pub const T_ADQUISICIO: &str = "T. ADQUISICIÓ";
pub const S_PATRIMONIAL: &str = "S. PATRIMONIAL";
pub const NATURALESA: &str = "NATURALESA";
pub const US: &str = "ÚS";
pub const VBC: &str = "V.B.C.";
pub const FA: &str = "F.A.";
pub const FP: &str = "F.P.";
pub const VC: &str = "V.C.";
pub const DOT_AMORT: &str = "DOT. AMORT";
pub const V_MERCAT: &str = "V. MERCAT";
pub const V_ASSEGURAN: &str = "V. ASSEGURAN";
pub const VRU: &str = "V.R.U.";
pub const DATA_1: &str = "DATA_1";
pub const DATA_2: &str = "DATA_2";
pub const DATA_3: &str = "DATA_3";

const INSPECTION: &str = "INSPECCIÓ FÍSICA O INVENTARI";

pub static PROFILE: LazyLock<FamilyProfile> = LazyLock::new(|| FamilyProfile {
    family: DocumentFamily::RelacioBens,
    description: "Relació de béns: rows keyed by 6-digit classification code, per page",
    headers: vec![
        CLASSIFICACIO,
        N_BE,
        ETIQUETA,
        D_ALTA,
        QUANT,
        DESCRIPCIO,
        C_GESTOR,
        C_COST,
        TITULAR,
        T_ADQUISICIO,
        S_PATRIMONIAL,
        NATURALESA,
        US,
        VBC,
        FA,
        FP,
        VC,
        DOT_AMORT,
        V_MERCAT,
        V_ASSEGURAN,
        VRU,
        DATA_1,
        DATA_2,
        DATA_3,
    ],
    identity_field: CLASSIFICACIO,
    identity_shape: Shape::exact_digits(6),
    anchor: AnchorRule {
        shape: Shape::exact_digits(6),
        x_band: None,
    },
    columns: vec![
        ColumnDefinition {
            name: "COL_1_CLASSIFICACIO",
            x_range: XRange::new(2.0, 8.0),
            kind: ColumnKind::Single {
                field: CLASSIFICACIO,
                shape: Shape::exact_digits(6),
            },
        },
        ColumnDefinition {
            name: "COL_2_NBE_ETIQUETA_DALTA",
            x_range: XRange::new(6.0, 12.0),
            kind: ColumnKind::Stacked {
                slots: vec![
                    Slot::shaped(N_BE, Shape::Digits { min: 1, max: 4 }),
                    Slot::shaped(ETIQUETA, Shape::Text),
                    Slot::shaped(D_ALTA, Shape::Date),
                ],
                absorb_last: false,
            },
        },
        ColumnDefinition {
            name: "COL_3_QUANT_DESCRIPCIO",
            x_range: XRange::new(9.0, 27.0),
            kind: ColumnKind::Stacked {
                slots: vec![
                    Slot::shaped(QUANT, Shape::Digits { min: 1, max: 2 }),
                    Slot::any(DESCRIPCIO),
                ],
                absorb_last: true,
            },
        },
        ColumnDefinition {
            name: "COL_4_CGESTOR_CCOST_TITULAR",
            x_range: XRange::new(17.0, 28.0),
            kind: ColumnKind::Stacked {
                slots: vec![Slot::any(C_GESTOR), Slot::any(C_COST), Slot::any(TITULAR)],
                absorb_last: false,
            },
        },
        ColumnDefinition {
            name: "COL_5_TADQ_SPATRIM_NAT_US",
            x_range: XRange::new(28.0, 37.0),
            kind: ColumnKind::Enumerated {
                choices: vec![
                    EnumChoice {
                        field: T_ADQUISICIO,
                        vocabulary: &ACQUISITION_TYPES,
                        mode: MatchMode::Contains,
                    },
                    EnumChoice {
                        field: S_PATRIMONIAL,
                        vocabulary: &PATRIMONIAL_STATUS,
                        mode: MatchMode::Exact,
                    },
                    EnumChoice {
                        field: NATURALESA,
                        vocabulary: &LEGAL_NATURE,
                        mode: MatchMode::Contains,
                    },
                    EnumChoice {
                        field: US,
                        vocabulary: &USAGE_TYPES,
                        mode: MatchMode::Exact,
                    },
                ],
                keywords: vec![
                    KeywordRule {
                        keyword: "INSPECCIÓ",
                        field: T_ADQUISICIO,
                        action: KeywordAction::Canonical(INSPECTION),
                    },
                    KeywordRule {
                        keyword: "DOMINI",
                        field: NATURALESA,
                        action: KeywordAction::Append,
                    },
                    KeywordRule {
                        keyword: "PÚBLIC",
                        field: NATURALESA,
                        action: KeywordAction::Append,
                    },
                ],
            },
        },
        ColumnDefinition {
            name: "COL_6_VBC_FA_FP_VC",
            x_range: XRange::new(36.0, 44.0),
            kind: ColumnKind::Stacked {
                slots: vec![
                    Slot::shaped(VBC, Shape::Amount),
                    Slot::shaped(FA, Shape::Amount),
                    Slot::shaped(FP, Shape::Amount),
                    Slot::shaped(VC, Shape::Amount),
                ],
                absorb_last: false,
            },
        },
        ColumnDefinition {
            name: "COL_7_DOT_MERCAT_ASSEGURAN_VRU",
            x_range: XRange::new(39.0, 48.0),
            kind: ColumnKind::Stacked {
                slots: vec![
                    Slot::shaped(DOT_AMORT, Shape::Amount),
                    Slot::shaped(V_MERCAT, Shape::Amount),
                    Slot::shaped(V_ASSEGURAN, Shape::Amount),
                    Slot::shaped(VRU, Shape::Amount),
                ],
                absorb_last: false,
            },
        },
        ColumnDefinition {
            name: "COL_8_DATA",
            x_range: XRange::new(43.0, 50.0),
            kind: ColumnKind::Stacked {
                slots: vec![
                    Slot::shaped(DATA_1, Shape::Date),
                    Slot::shaped(DATA_2, Shape::Date),
                    Slot::shaped(DATA_3, Shape::Date),
                ],
                absorb_last: false,
            },
        },
    ],
    repairs: vec![RepairRule {
        field: T_ADQUISICIO,
        keyword: "INSPECCIÓ",
        canonical: INSPECTION,
    }],
    completions: vec![
        (T_ADQUISICIO, &ACQUISITION_TYPES),
        (S_PATRIMONIAL, &PATRIMONIAL_STATUS),
        (NATURALESA, &LEGAL_NATURE),
        (US, &USAGE_TYPES),
    ],
    totals: TotalsRule {
        fields: vec![DESCRIPCIO, ETIQUETA, C_GESTOR],
        keywords: TOTALS_KEYWORDS,
    },
    identity: IdentityRecipe {
        date_field: D_ALTA,
        number_field: N_BE,
    },
    combine: CombinePolicy::Concatenate,
    pooled: false,
    amount_fields: vec![VBC, V_MERCAT, V_ASSEGURAN],
});
