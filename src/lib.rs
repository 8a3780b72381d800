use wasm_bindgen::prelude::*;
use js_sys::{Array, Object, Reflect, Uint8Array};

pub mod brightness;
pub mod color;
pub mod compose;
pub mod error;
pub mod export;
pub mod extract;
pub mod layout;
pub mod session;
pub mod source;

pub use color::Rgb;
pub use compose::{CanvasSurface, compose};
pub use error::{ErrorKind, PosterError};
pub use export::{Export, encode_png, export_filename};
pub use extract::{FixedPalette, KMeansExtractor, Palette, PaletteExtractor};
pub use session::{Analysis, Session};
pub use source::SourceImage;

/// Module init: panics and `log` records go to the browser console.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("console logger already installed");
    }
}

// ------------------------------------------------------------
// JS conversion helpers
// ------------------------------------------------------------

/// Thrown to the page as a JS `Error`: `message` is the notice to show,
/// `cause` keeps the full error text for the console.
fn js_error(e: PosterError) -> JsValue {
    let err = js_sys::Error::new(&e.user_notice());
    err.set_cause(&JsValue::from_str(&e.to_string()));
    err.into()
}

fn palette_to_js(palette: &Palette) -> Array {
    let out = Array::new();
    for hex in palette.to_hex() {
        out.push(&JsValue::from_str(&hex));
    }
    out
}

fn set(target: &Object, key: &str, value: &JsValue) -> Result<(), JsValue> {
    Reflect::set(target, &JsValue::from_str(key), value)?;
    Ok(())
}

// ------------------------------------------------------------
// Stateful API used by the page
// ------------------------------------------------------------

/// One page's worth of state: the uploaded image, the last analysis and the
/// rendered poster. The page drives it from its upload, analyze and
/// download handlers and shows the `message` of any thrown error as a notice.
#[wasm_bindgen]
pub struct PosterSession {
    inner: Session,
}

#[wasm_bindgen]
impl PosterSession {
    #[wasm_bindgen(constructor)]
    pub fn new() -> PosterSession {
        PosterSession {
            inner: Session::new(),
        }
    }

    /// Decode `input` and make it the current image. `content_type` is the file's
    /// declared type; anything outside `image/*` is rejected.
    pub fn upload(&mut self, input: Vec<u8>, content_type: &str) -> Result<(), JsValue> {
        self.inner.upload(&input, content_type).map_err(js_error)
    }

    /// Returns `{ palette: string[], dark: boolean }`.
    pub fn analyze(&mut self) -> Result<Object, JsValue> {
        let analysis = self.inner.analyze().map_err(js_error)?;
        let result = Object::new();
        set(&result, "palette", &palette_to_js(&analysis.palette))?;
        set(&result, "dark", &JsValue::from_bool(analysis.is_dark))?;
        Ok(result)
    }

    /// Returns `{ filename: string, image: Uint8Array }` holding PNG bytes.
    pub fn download(&self) -> Result<Object, JsValue> {
        let export = self.inner.download().map_err(js_error)?;
        let result = Object::new();
        set(&result, "filename", &JsValue::from_str(&export.filename))?;
        set(&result, "image", &Uint8Array::from(export.bytes.as_slice()))?;
        Ok(result)
    }

    /// Straight RGBA of the current poster, for `new ImageData(...)`.
    pub fn pixels(&self) -> Result<Uint8Array, JsValue> {
        let surface = self
            .inner
            .surface()
            .ok_or_else(|| js_error(PosterError::NothingToExport))?;
        Ok(Uint8Array::from(surface.to_rgba().as_slice()))
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        layout::CANVAS_WIDTH
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        layout::CANVAS_HEIGHT
    }

    #[wasm_bindgen(getter, js_name = canAnalyze)]
    pub fn can_analyze(&self) -> bool {
        self.inner.can_analyze()
    }

    #[wasm_bindgen(getter, js_name = canDownload)]
    pub fn can_download(&self) -> bool {
        self.inner.can_download()
    }
}

impl Default for PosterSession {
    fn default() -> Self {
        Self::new()
    }
}

// ------------------------------------------------------------
// One-shot helpers
// ------------------------------------------------------------

/// Build a poster in one call.
///
/// Steps performed:
/// 1. Check the MIME type and decode the image.
/// 2. Extract up to nine dominant colours with k-means in Lab space.
/// 3. Sample brightness on a 16×16 grid to choose the swatch outline.
/// 4. Render the 1080×1350 poster and encode it as PNG.
///
/// Returns `{ image: Uint8Array, palette: string[], dark: boolean, filename: string }`.
#[wasm_bindgen]
pub fn compose_poster(input: Vec<u8>, content_type: &str) -> Result<Object, JsValue> {
    let mut session = Session::new();
    session.upload(&input, content_type).map_err(js_error)?;
    let analysis = session.analyze().map_err(js_error)?;
    let export = session.download().map_err(js_error)?;

    let result = Object::new();
    set(&result, "image", &Uint8Array::from(export.bytes.as_slice()))?;
    set(&result, "palette", &palette_to_js(&analysis.palette))?;
    set(&result, "dark", &JsValue::from_bool(analysis.is_dark))?;
    set(&result, "filename", &JsValue::from_str(&export.filename))?;
    Ok(result)
}

/// Dominant colours of an image as `#rrggbb` strings, most dominant first.
/// `n_colors` is held to `1..=9`.
#[wasm_bindgen]
pub fn extract_palette(input: Vec<u8>, n_colors: usize) -> Result<Array, JsValue> {
    let source = SourceImage::decode(&input).map_err(js_error)?;
    let palette = KMeansExtractor
        .extract(&source, layout::clamp_colors(n_colors))
        .map_err(js_error)?;
    Ok(palette_to_js(&palette))
}
