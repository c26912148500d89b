//! HTTP DTOs for expert desk endpoints.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnlineStatusRequest {
    pub is_online: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionReportRequest {
    pub summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn online_status_uses_camel_case() {
        let req: OnlineStatusRequest = serde_json::from_str(r#"{"isOnline": true}"#).unwrap();
        assert!(req.is_online);
    }
}
