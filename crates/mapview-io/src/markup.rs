//! HTML documents handed to the host's web view.

use mapview_core::{codec, CodecError};
use mapview_renderer::leaflet::html_attr;
use mapview_renderer::{LeafletScript, RenderEngine, RenderError};
use thiserror::Error;

use crate::settings::MapViewSettings;

#[derive(Error, Debug)]
pub enum MarkupError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// A page that loads the in-browser loader script and passes it the encoded
/// config as a single-quoted string literal.
pub fn loader_page(raw: &str, settings: &MapViewSettings) -> Result<String, MarkupError> {
    let config = codec::decode(raw)?;
    let json = codec::encode(&config)?;
    log::debug!(
        "Loader page for {} marker(s) via {}",
        config.marker_count(),
        settings.loader_script_url
    );

    Ok(format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <script src=\"{}\"></script>\n\
         <script>\n\
         var map = new Mapper();\n\
         var json = '{}';\n\
         map.draw(json);\n\
         </script>\n\
         </html>\n",
        html_attr(&settings.loader_script_url),
        json
    ))
}

/// A self-contained page: the render engine runs here against
/// [`LeafletScript`] and the page carries the resulting draw calls.
pub fn inline_page(raw: &str, settings: &MapViewSettings) -> Result<String, MarkupError> {
    let config = codec::decode(raw)?;

    let mut engine = RenderEngine::new(LeafletScript::new(), settings.engine_options())?;
    engine.render_from_config(config)?;
    // Head scripts load synchronously, so the library is present before the body runs.
    engine.on_assets_loaded()?;
    let script = engine.into_backend();

    let mut page = String::from("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    for tag in script.head_tags() {
        page.push_str(tag);
        page.push('\n');
    }
    page.push_str("</head>\n<body>\n<script>\n");
    page.push_str(&script.script());
    page.push_str("\n</script>\n</body>\n</html>\n");
    Ok(page)
}
