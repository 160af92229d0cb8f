mod json_contract;
mod scale_builder;
mod scale_config;

pub use json_contract::{SCALE_CONFIG_JSON_SCHEMA_V1, ScaleConfigJsonContractV1};
pub use scale_builder::ScaleInput;
pub use scale_config::{LogScaleOptions, ScaleConfig};
