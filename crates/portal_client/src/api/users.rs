use reqwest::multipart::{Form, Part};
use serde_json::Value;
use shared::protocol::RegisterRequest;
use tracing::{info, warn};

use crate::{
    error::{CallFailure, TransportError},
    transport::HttpMethod,
    PortalClient,
};

pub const REGISTER_PATH: &str = "/user/register";
pub const REGISTER_OK_NOTICE: &str = "Registration successful, please log in";

#[derive(Debug, Clone)]
pub struct AvatarUpload {
    pub filename: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl PortalClient {
    /// Creates an account. Does not sign the visitor in.
    pub async fn register(&self, request: &RegisterRequest) -> bool {
        if self.validated(request.validate()).is_err() {
            return false;
        }
        let created = self
            .transport()
            .call::<_, Value>(HttpMethod::Post, REGISTER_PATH, request)
            .await
            .is_some();
        self.finish_registration(&request.username, created)
    }

    /// Multipart variant of [`PortalClient::register`] that uploads an avatar
    /// image in the `avatar` part.
    pub async fn register_with_avatar(
        &self,
        request: &RegisterRequest,
        avatar: AvatarUpload,
    ) -> bool {
        if self.validated(request.validate()).is_err() {
            return false;
        }
        let form = match registration_form(request, avatar) {
            Ok(form) => form,
            Err(err) => {
                warn!(error = %err, "could not build registration form");
                return false;
            }
        };
        let created = self
            .transport()
            .call_multipart::<Value>(REGISTER_PATH, form)
            .await
            .is_ok();
        self.finish_registration(&request.username, created)
    }

    fn finish_registration(&self, username: &str, created: bool) -> bool {
        if created {
            info!(username, "registered");
            self.notifier().inform(REGISTER_OK_NOTICE);
        }
        created
    }
}

fn registration_form(
    request: &RegisterRequest,
    avatar: AvatarUpload,
) -> Result<Form, CallFailure> {
    let mut part = Part::bytes(avatar.bytes).file_name(avatar.filename);
    if let Some(mime_type) = avatar.mime_type.as_deref() {
        part = part
            .mime_str(mime_type)
            .map_err(|err| CallFailure::Transport(TransportError::Http(err)))?;
    }

    let mut form = Form::new()
        .text("username", request.username.trim().to_string())
        .text("password", request.password.clone());
    if let Some(nickname) = request.nickname.as_deref().map(str::trim) {
        if !nickname.is_empty() {
            form = form.text("nickname", nickname.to_string());
        }
    }
    Ok(form.part("avatar", part))
}
