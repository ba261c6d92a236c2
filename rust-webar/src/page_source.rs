use rust_webar_api::CommandError;
use std::path::PathBuf;

/// Where `loadPage` finds client pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ARPageSource {
    // Pages served by a development server, `<base_url>/<page>.html`
    #[serde(rename_all = "camelCase")]
    Dev { base_url: String },
    // Pages shipped with the application, `<root>/www/<page>.html`
    Bundle { root: PathBuf },
}

impl Default for ARPageSource {
    fn default() -> ARPageSource {
        ARPageSource::Bundle { root: PathBuf::from(".") }
    }
}

impl ARPageSource {
    /// URL of `page`. Bundled pages must exist; dev pages are not checked.
    pub fn resolve(&self, page: &str) -> Result<String, CommandError> {
        match *self {
            ARPageSource::Dev { ref base_url } => {
                Ok(format!("{}/{}.html", base_url.trim_end_matches('/'), page))
            }
            ARPageSource::Bundle { ref root } => {
                let path = root.join("www").join(format!("{}.html", page));
                if !path.is_file() {
                    return Err(CommandError::InvalidPage(page.to_owned()));
                }
                Ok(format!("file://{}", path.display()))
            }
        }
    }
}
