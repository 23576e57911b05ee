use super::{FieldSpec, RecordType, ValueKind};

const OPTICAL_LOSS: &str = "Optical Loss";
const OPTICAL_POWER: &str = "Optical Power";

// Loss bottoms out at -60 dB; anything above 0 dB isn't loss. NetBox only
// bounds integer fields, so the fractional loss rows stay unbounded text.
const LOSS_MIN_DB: i64 = -60;
const LOSS_MAX_DB: i64 = 0;

// 850 nm multimode up to the end of the U-band.
const WAVELENGTH_MIN_NM: i64 = 850;
const WAVELENGTH_MAX_NM: i64 = 1676;

const PORTS: &[RecordType] = &[RecordType::FrontPort, RecordType::RearPort];

/// ITU-T fiber types, per the FOA single-mode reference
pub const FIBER_TYPES: &[&str] = &[
    "G.651.1",
    "G.652",
    "G.652.B",
    "G.652.D",
    "G.653",
    "G.653.A",
    "G.653.B",
    "G.654",
    "G.654.A",
    "G.654.B",
    "G.654.C",
    "G.654.D",
    "G.654.E",
    "G.655",
    "G.655.C",
    "G.655.D",
    "G.655.E",
    "G.656",
    "G.657",
    "G.657.A1",
    "G.657.A2",
    "G.657.B2",
    "G.657.B3",
];

/// Optical custom fields, in provisioning order
pub static OPTICAL_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "fiber_type",
        label: "Fiber Type",
        group: OPTICAL_LOSS,
        value_kind: ValueKind::Select,
        description: "The ITU fiber type of the cable.",
        targets: &[RecordType::Cable],
        choices: FIBER_TYPES,
        default: Some("G.652"),
        min: None,
        max: None,
    },
    FieldSpec {
        name: "attenuation_coeff",
        label: "Attn Coeff",
        group: OPTICAL_LOSS,
        value_kind: ValueKind::Text,
        description: "The attenuation coefficient of the cable per km",
        targets: &[RecordType::Cable],
        choices: &[],
        default: Some("0.4"),
        min: None,
        max: None,
    },
    FieldSpec {
        name: "power_loss",
        label: "Pwr Loss",
        group: OPTICAL_LOSS,
        value_kind: ValueKind::Text,
        description: "The overall power loss on the fiber across the cable's length.",
        targets: &[RecordType::Cable],
        choices: &[],
        default: None,
        min: None,
        max: None,
    },
    FieldSpec {
        name: "attenuator_loss",
        label: "Attn Loss",
        group: OPTICAL_LOSS,
        value_kind: ValueKind::Integer,
        description: "The intentionally-added optical loss on this port from a fixed or variable attenuator.",
        targets: PORTS,
        choices: &[],
        default: None,
        min: Some(LOSS_MIN_DB),
        max: Some(LOSS_MAX_DB),
    },
    FieldSpec {
        name: "insertion_loss",
        label: "Ins Loss",
        group: OPTICAL_LOSS,
        value_kind: ValueKind::Text,
        description: "The optical loss caused by passing through the port",
        targets: PORTS,
        choices: &[],
        default: None,
        min: None,
        max: None,
    },
    FieldSpec {
        name: "return_loss",
        label: "Rtn Loss",
        group: OPTICAL_LOSS,
        value_kind: ValueKind::Text,
        description: "The optical loss from reflection at the port",
        targets: PORTS,
        choices: &[],
        default: None,
        min: None,
        max: None,
    },
    FieldSpec {
        name: "max_tx_power",
        label: "Max TX Pwr",
        group: OPTICAL_POWER,
        value_kind: ValueKind::Text,
        description: "The maximum transmission power of the transceiver",
        targets: &[RecordType::Interface],
        choices: &[],
        default: None,
        min: None,
        max: None,
    },
    FieldSpec {
        name: "min_tx_power",
        label: "Min TX Pwr",
        group: OPTICAL_POWER,
        value_kind: ValueKind::Text,
        description: "The minimum transmission power of the transceiver",
        targets: &[RecordType::Interface],
        choices: &[],
        default: None,
        min: None,
        max: None,
    },
    FieldSpec {
        name: "rx_overload",
        label: "RX Ovld",
        group: OPTICAL_POWER,
        value_kind: ValueKind::Text,
        description: "The overload power threshold of the transceiver",
        targets: &[RecordType::Interface],
        choices: &[],
        default: None,
        min: None,
        max: None,
    },
    FieldSpec {
        name: "rx_sensitivity",
        label: "RX Sen",
        group: OPTICAL_POWER,
        value_kind: ValueKind::Text,
        description: "The sensitivity power threshold of the transceiver",
        targets: &[RecordType::Interface],
        choices: &[],
        default: None,
        min: None,
        max: None,
    },
    FieldSpec {
        name: "tx_wavelength",
        label: "TX Wave",
        group: OPTICAL_POWER,
        value_kind: ValueKind::Integer,
        description: "The specific TX wavelength of the transceiver",
        targets: &[RecordType::Interface],
        choices: &[],
        default: None,
        min: Some(WAVELENGTH_MIN_NM),
        max: Some(WAVELENGTH_MAX_NM),
    },
    FieldSpec {
        name: "rx_wavelength",
        label: "RX Wave",
        group: OPTICAL_POWER,
        value_kind: ValueKind::Integer,
        description: "The specific RX wavelength of the transceiver",
        targets: &[RecordType::Interface],
        choices: &[],
        default: None,
        min: Some(WAVELENGTH_MIN_NM),
        max: Some(WAVELENGTH_MAX_NM),
    },
];
