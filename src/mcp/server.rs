//! Gizi MCP Server Implementation
//!
//! Exposes requirement resolution and label comparison as MCP tools.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use crate::models::{AgeUnit, UserAttributes};
use crate::reference::ReferenceTable;
use crate::tools::comparison;
use crate::tools::reference;
use crate::tools::requirements::{self, RequirementNotFoundResponse};
use crate::tools::status::StatusTracker;

/// Gizi MCP Service
#[derive(Clone)]
pub struct GiziService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    reference_path: PathBuf,
    /// Current table snapshot; readers clone the inner Arc and release the lock
    table: Arc<RwLock<Arc<ReferenceTable>>>,
    tool_router: ToolRouter<GiziService>,
}

impl GiziService {
    pub fn new(reference_path: PathBuf, table: ReferenceTable) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(reference_path.clone()))),
            reference_path,
            table: Arc::new(RwLock::new(Arc::new(table))),
            tool_router: Self::tool_router(),
        }
    }

    fn snapshot(&self) -> Result<Arc<ReferenceTable>, McpError> {
        self.table
            .read()
            .map(|table| Arc::clone(&table))
            .map_err(|_| McpError::internal_error("Reference table lock poisoned", None))
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Parameter Structs
// ============================================================================

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct UserAttributesParams {
    /// Gender category as written in the reference table (e.g. "Laki-laki", "Perempuan")
    pub gender: Option<String>,
    /// Age as a whole number
    pub age: Option<u32>,
    /// "year"/"tahun" or "month"/"bulan"
    pub age_unit: Option<String>,
    #[serde(default)]
    pub is_pregnant: bool,
    /// Gestational age, bucketed into trimesters (1-3, 4-6, 7+)
    pub gestational_weeks_or_months: Option<u32>,
    #[serde(default)]
    pub is_breastfeeding: bool,
    /// Infant age in months (up to 6, or 7-12)
    pub infant_age_months: Option<u32>,
}

impl UserAttributesParams {
    fn into_attributes(self) -> UserAttributes {
        let age_unit = self.age_unit.as_deref().and_then(|unit| {
            let parsed = AgeUnit::from_str(unit);
            if parsed.is_none() {
                tracing::debug!("Ignoring unknown age unit '{}'", unit);
            }
            parsed
        });

        UserAttributes {
            gender: self.gender,
            age: self.age,
            age_unit,
            is_pregnant: self.is_pregnant,
            gestational_weeks_or_months: self.gestational_weeks_or_months,
            is_breastfeeding: self.is_breastfeeding,
            infant_age_months: self.infant_age_months,
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CompareNutritionParams {
    /// Measured values keyed by nutrient short name (e.g. {"energi": 250, "gula": "12,5"})
    pub measured: Map<String, Value>,
    /// Daily requirement keyed by the same names; non-numeric values count as 0
    pub required: Map<String, Value>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CompareLabelParams {
    /// Raw OCR result object for the nutrition label
    pub ocr_result: Map<String, Value>,
    /// Attributes of the user the label is compared for
    #[serde(default)]
    pub attributes: UserAttributesParams,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl GiziService {
    // --- Status ---

    #[tool(description = "Get the current status of the Gizi service including build info, reference table and process information")]
    async fn gizi_status(&self) -> Result<CallToolResult, McpError> {
        let rows = self.snapshot()?.len();
        let tracker = self.status_tracker.lock().await;
        to_json(&tracker.get_status(rows))
    }

    #[tool(description = "Get instructions for resolving daily requirements and comparing nutrition labels. Call this when unsure how to use the Gizi tools.")]
    fn gizi_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::GIZI_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(GIZI_INSTRUCTIONS)]))
    }

    // --- Requirements ---

    #[tool(description = "Resolve the daily nutrient requirement for a user from gender, age, age unit, pregnancy and breastfeeding status")]
    fn get_daily_requirements(&self, Parameters(p): Parameters<UserAttributesParams>) -> Result<CallToolResult, McpError> {
        let table = self.snapshot()?;
        let attrs = p.into_attributes();
        match requirements::get_daily_requirements(&table, &attrs) {
            Some(response) => to_json(&response),
            None => to_json(&RequirementNotFoundResponse::default()),
        }
    }

    // --- Comparison ---

    #[tool(description = "Compare measured nutrient values against daily requirements. Each nutrient is within_limit or exceeds_limit; a zero requirement is never exceeded.")]
    fn compare_nutrition(&self, Parameters(p): Parameters<CompareNutritionParams>) -> Result<CallToolResult, McpError> {
        to_json(&comparison::compare_values(&p.measured, &p.required))
    }

    #[tool(description = "Extract the main nutrients from a raw OCR result, resolve the user's daily requirement and compare them. Also returns the payload for the recommendation service.")]
    fn compare_label(&self, Parameters(p): Parameters<CompareLabelParams>) -> Result<CallToolResult, McpError> {
        let table = self.snapshot()?;
        let attrs = p.attributes.into_attributes();
        to_json(&comparison::compare_label(&table, &p.ocr_result, &attrs))
    }

    // --- Reference table ---

    #[tool(description = "Validate the loaded reference table: malformed rows, unparseable values and overlapping age ranges")]
    fn validate_reference_table(&self) -> Result<CallToolResult, McpError> {
        let table = self.snapshot()?;
        to_json(&reference::validate_reference_table(&table))
    }

    #[tool(description = "Reload the reference table from disk. The previous table stays active if loading fails.")]
    fn reload_reference_table(&self) -> Result<CallToolResult, McpError> {
        let (table, response) = reference::load_reference_table(&self.reference_path)
            .map_err(|e| McpError::internal_error(e, None))?;

        let mut current = self
            .table
            .write()
            .map_err(|_| McpError::internal_error("Reference table lock poisoned", None))?;
        *current = Arc::new(table);
        drop(current);

        tracing::info!("{}", response.message);
        to_json(&response)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for GiziService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "gizi".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Gizi Daily Nutrient Requirements".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Gizi - daily nutrient requirements and nutrition label comparison. \
                 IMPORTANT: Call gizi_instructions first. \
                 Requirements: get_daily_requirements. \
                 Comparison: compare_label (raw OCR result), compare_nutrition (extracted values). \
                 Reference table: validate_reference_table, reload_reference_table. \
                 Status: gizi_status."
                    .into(),
            ),
        }
    }
}
