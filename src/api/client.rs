use crate::api::types::{
    AuditRecord, AuditResult, AuthResponse, ChatMessage, ChatReply, ClientProfile,
    DashboardOverview, DashboardProject, Lead, LeadResponse, ProfileUpdate,
};
use crate::api::{ApiError, ApiResult};
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

/// Upload limit enforced before a document ever leaves the client.
pub const MAX_DOCUMENT_BYTES: usize = 5 * 1024 * 1024;

const ALLOWED_DOCUMENT_EXTENSIONS: [&str; 3] = ["pdf", "xlsx", "xls"];

fn validate_document(file_name: &str, size_bytes: usize) -> ApiResult<()> {
    if size_bytes > MAX_DOCUMENT_BYTES {
        return Err(ApiError::FileTooLarge);
    }

    let extension = std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension {
        Some(ext) if ALLOWED_DOCUMENT_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        _ => Err(ApiError::UnsupportedFormat {
            file_name: file_name.to_string(),
        }),
    }
}

/// Client for the application backend (auth, document audit, leads and the
/// client dashboard). Protected endpoints send the session token as a bearer
/// header when one is attached.
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    http: reqwest::Client,
    token: Option<String>,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/v1/{}", self.base_url, path)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Exchange a dashboard access code for a token. The code is trimmed
    /// before submission; normalization beyond that is the backend's concern.
    pub async fn verify_code(&self, access_code: &str) -> ApiResult<AuthResponse> {
        let response = self
            .http
            .post(self.endpoint("auth/verify-code"))
            .json(&json!({ "access_code": access_code.trim() }))
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }

    /// Upload a specification for the document audit. The size and format
    /// limits are enforced here first, mirroring the upload form.
    pub async fn parse_document(&self, file_name: &str, bytes: Vec<u8>) -> ApiResult<AuditResult> {
        validate_document(file_name, bytes.len())?;
        debug!(file_name, size = bytes.len(), "uploading document for audit");

        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part("file", part);

        let response = self
            .authorize(self.http.post(self.endpoint("ai/parse-document")))
            .multipart(form)
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }

    /// Render the audit result as a PDF report. The result is sent back
    /// verbatim; the bytes are the finished document.
    pub async fn download_report(&self, result: &AuditResult) -> ApiResult<Vec<u8>> {
        let response = self
            .authorize(self.http.post(self.endpoint("ai/download-report")))
            .json(result)
            .send()
            .await?;

        Ok(check(response).await?.bytes().await?.to_vec())
    }

    pub async fn chat(
        &self,
        history: &[ChatMessage],
        message: &str,
        context: Option<&str>,
    ) -> ApiResult<ChatReply> {
        let response = self
            .authorize(self.http.post(self.endpoint("ai/chat")))
            .json(&json!({
                "history": history,
                "message": message,
                "context": context,
            }))
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }

    pub async fn submit_lead(&self, lead: &Lead) -> ApiResult<LeadResponse> {
        let response = self
            .http
            .post(self.endpoint("leads/submit"))
            .json(lead)
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }

    pub async fn dashboard_overview(&self) -> ApiResult<DashboardOverview> {
        let response = self
            .authorize(self.http.get(self.endpoint("dashboard/overview")))
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }

    pub async fn dashboard_projects(&self) -> ApiResult<Vec<DashboardProject>> {
        #[derive(Deserialize)]
        struct ProjectsEnvelope {
            #[serde(default)]
            projects: Vec<DashboardProject>,
        }

        let response = self
            .authorize(self.http.get(self.endpoint("dashboard/projects")))
            .send()
            .await?;

        let envelope: ProjectsEnvelope = check(response).await?.json().await?;
        Ok(envelope.projects)
    }

    /// The backend has no per-project endpoint; the detail view selects from
    /// the full listing, and so does this.
    pub async fn dashboard_project(&self, id: &str) -> ApiResult<Option<DashboardProject>> {
        let projects = self.dashboard_projects().await?;
        Ok(projects.into_iter().find(|p| p.id.as_string() == id))
    }

    pub async fn dashboard_audit_history(&self) -> ApiResult<Vec<AuditRecord>> {
        #[derive(Deserialize)]
        struct AuditsEnvelope {
            #[serde(default)]
            audits: Vec<AuditRecord>,
        }

        let response = self
            .authorize(self.http.get(self.endpoint("dashboard/audit-history")))
            .send()
            .await?;

        let envelope: AuditsEnvelope = check(response).await?.json().await?;
        Ok(envelope.audits)
    }

    pub async fn dashboard_profile(&self) -> ApiResult<ClientProfile> {
        #[derive(Deserialize)]
        struct ProfileEnvelope {
            profile: ClientProfile,
        }

        let response = self
            .authorize(self.http.get(self.endpoint("dashboard/profile")))
            .send()
            .await?;

        let envelope: ProfileEnvelope = check(response).await?.json().await?;
        Ok(envelope.profile)
    }

    /// Patch the editable profile fields. The backend echoes the applied
    /// subset back; callers refetch the profile when they need the full view.
    pub async fn update_profile(&self, updates: &ProfileUpdate) -> ApiResult<()> {
        let response = self
            .authorize(self.http.patch(self.endpoint("dashboard/profile")))
            .json(updates)
            .send()
            .await?;

        check(response).await?;
        Ok(())
    }
}

/// Map a non-2xx response onto the error taxonomy, lifting the backend's
/// `detail` field when the body carries one.
async fn check(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v.get("detail").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_default();

    Err(match status.as_u16() {
        401 => ApiError::InvalidCredentials,
        422 => ApiError::InvalidDocument { detail },
        429 => ApiError::RateLimited,
        code => ApiError::Server {
            status: code,
            detail,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_document_limits() {
        assert!(validate_document("spec.pdf", 1024).is_ok());
        assert!(validate_document("estimate.XLSX", 1024).is_ok());

        assert!(matches!(
            validate_document("spec.pdf", MAX_DOCUMENT_BYTES + 1),
            Err(ApiError::FileTooLarge)
        ));
        assert!(matches!(
            validate_document("notes.docx", 1024),
            Err(ApiError::UnsupportedFormat { .. })
        ));
        assert!(matches!(
            validate_document("no_extension", 1024),
            Err(ApiError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_endpoint_building_trims_slash() {
        let client = BackendClient::new("http://localhost:8000/");
        assert_eq!(
            client.endpoint("auth/verify-code"),
            "http://localhost:8000/api/v1/auth/verify-code"
        );
    }
}
