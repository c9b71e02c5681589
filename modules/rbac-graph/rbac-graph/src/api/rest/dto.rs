use serde::{Deserialize, Serialize};

/// REST DTO for the what-if request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhatIfRequest {
    /// A single YAML document describing the candidate binding.
    pub yaml: String,
}
