use crate::{
    api::{MultipartBody, RequestBody},
    cli::{actions::print_envelope, globals::GlobalArgs},
};
use anyhow::{Context, Result};
use reqwest::Method;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub method: Method,
    pub path: String,
    pub data: Option<String>,
    pub files: Vec<(String, PathBuf)>,
    pub fields: Vec<(String, String)>,
    pub anonymous: bool,
}

impl Args {
    fn is_multipart(&self) -> bool {
        !self.files.is_empty() || !self.fields.is_empty()
    }
}

/// Execute the request action.
/// # Errors
/// Returns an error if the body is invalid, the request cannot be completed, or the
/// response is a failure envelope.
pub async fn execute(args: Args) -> Result<()> {
    let client = args.globals.client()?;
    let body = build_body(&args).await?;

    debug!(
        "{} {} (multipart: {}, anonymous: {})",
        args.method,
        args.path,
        args.is_multipart(),
        args.anonymous
    );

    let envelope = client
        .request(args.method, &args.path, body, !args.anonymous)
        .await?;

    print_envelope(&envelope)
}

async fn build_body(args: &Args) -> Result<Option<RequestBody>> {
    if args.is_multipart() {
        let mut form = MultipartBody::new();
        for (name, value) in &args.fields {
            form = form.text(name, value);
        }
        for (name, path) in &args.files {
            form = form.file_from_path(name, path).await?;
        }
        return Ok(Some(RequestBody::Multipart(form)));
    }

    args.data
        .as_deref()
        .map(|data| {
            serde_json::from_str(data)
                .map(RequestBody::Json)
                .context("--data is not valid JSON")
        })
        .transpose()
}
