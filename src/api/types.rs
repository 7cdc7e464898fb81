use serde::{Deserialize, Serialize};

// ============================================================================
// Request Types
// ============================================================================

/// Selected symptoms by identifier or display name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymptomRequest {
    pub symptoms: Vec<String>,
}

/// Pre-built 0/1 feature vector in symptom catalog order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorRequest {
    pub symptoms: Vec<i64>,
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelResponse {
    pub prediction: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
