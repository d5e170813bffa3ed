//! Request and response payloads of the prediction API

use anyhow::{Context, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::pipeline::{FeatureSchema, FeatureSpec, FeatureType, RiskPrediction};

/// Message returned while no model is loaded
pub const MODEL_UNAVAILABLE_MESSAGE: &str = "Modelo não carregado. Verifique os logs do servidor.";

/// Welcome message of `GET /`
pub const WELCOME_MESSAGE: &str = "Bem-vindo à API de Classificação de Risco de Crédito";

/// One applicant, as accepted by `POST /predict`.
///
/// Field names and types mirror the applicant table columns the model was
/// trained on; every field is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ClientData {
    pub code_gender: String,
    pub flag_own_car: String,
    pub flag_own_realty: String,
    pub cnt_children: i64,
    pub amt_income_total: f64,
    pub name_income_type: String,
    pub name_education_type: String,
    pub name_family_status: String,
    pub name_housing_type: String,
    pub days_birth: i64,
    pub days_employed: i64,
    pub flag_work_phone: i64,
    pub flag_phone: i64,
    pub flag_email: i64,
    pub occupation_type: String,
    pub cnt_fam_members: f64,
}

impl ClientData {
    /// The feature schema this payload provides
    pub fn feature_schema() -> FeatureSchema {
        use FeatureType::{Categorical, Numeric};

        FeatureSchema::new(vec![
            FeatureSpec::new("CODE_GENDER", Categorical),
            FeatureSpec::new("FLAG_OWN_CAR", Categorical),
            FeatureSpec::new("FLAG_OWN_REALTY", Categorical),
            FeatureSpec::new("CNT_CHILDREN", Numeric),
            FeatureSpec::new("AMT_INCOME_TOTAL", Numeric),
            FeatureSpec::new("NAME_INCOME_TYPE", Categorical),
            FeatureSpec::new("NAME_EDUCATION_TYPE", Categorical),
            FeatureSpec::new("NAME_FAMILY_STATUS", Categorical),
            FeatureSpec::new("NAME_HOUSING_TYPE", Categorical),
            FeatureSpec::new("DAYS_BIRTH", Numeric),
            FeatureSpec::new("DAYS_EMPLOYED", Numeric),
            FeatureSpec::new("FLAG_WORK_PHONE", Numeric),
            FeatureSpec::new("FLAG_PHONE", Numeric),
            FeatureSpec::new("FLAG_EMAIL", Numeric),
            FeatureSpec::new("OCCUPATION_TYPE", Categorical),
            FeatureSpec::new("CNT_FAM_MEMBERS", Numeric),
        ])
    }

    /// Wrap the payload into a one-row feature table
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let df = df! {
            "CODE_GENDER" => [self.code_gender.as_str()],
            "FLAG_OWN_CAR" => [self.flag_own_car.as_str()],
            "FLAG_OWN_REALTY" => [self.flag_own_realty.as_str()],
            "CNT_CHILDREN" => [self.cnt_children],
            "AMT_INCOME_TOTAL" => [self.amt_income_total],
            "NAME_INCOME_TYPE" => [self.name_income_type.as_str()],
            "NAME_EDUCATION_TYPE" => [self.name_education_type.as_str()],
            "NAME_FAMILY_STATUS" => [self.name_family_status.as_str()],
            "NAME_HOUSING_TYPE" => [self.name_housing_type.as_str()],
            "DAYS_BIRTH" => [self.days_birth],
            "DAYS_EMPLOYED" => [self.days_employed],
            "FLAG_WORK_PHONE" => [self.flag_work_phone],
            "FLAG_PHONE" => [self.flag_phone],
            "FLAG_EMAIL" => [self.flag_email],
            "OCCUPATION_TYPE" => [self.occupation_type.as_str()],
            "CNT_FAM_MEMBERS" => [self.cnt_fam_members],
        }
        .context("Failed to build feature row")?;
        Ok(df)
    }
}

/// Successful prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prediction: String,
    pub probability_baixo_risco: String,
    pub probability_alto_risco: String,
}

impl From<RiskPrediction> for PredictionResponse {
    fn from(p: RiskPrediction) -> Self {
        Self {
            prediction: p.label.to_string(),
            probability_baixo_risco: format!("{:.2}", p.probability_low),
            probability_alto_risco: format!("{:.2}", p.probability_high),
        }
    }
}

/// Soft error body; sent with 200 when the model is unavailable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Body of `GET /`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
}
