//! Browser page integration.
//!
//! The canvas, the document link and the debug overlay live in the page; the
//! scroll position and viewport size come from it as well. Listeners are
//! registered once and live as long as the page.

use std::sync::Arc;

use anyhow::Context as _;
use wasm_bindgen::{JsCast, prelude::*};
use winit::{dpi::LogicalSize, event_loop::EventLoopProxy, window::Window};

use crate::{config::DocumentLink, flow::FlowEvent, resources, stats::StatsSample};

fn js_error(err: JsValue) -> anyhow::Error {
    anyhow::anyhow!("{err:?}")
}

fn window() -> anyhow::Result<web_sys::Window> {
    web_sys::window().context("no global window")
}

fn document() -> anyhow::Result<web_sys::Document> {
    window()?.document().context("window has no document")
}

pub fn canvas(id: &str) -> anyhow::Result<web_sys::HtmlCanvasElement> {
    document()?
        .get_element_by_id(id)
        .with_context(|| format!("no element #{id}"))?
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .map_err(|_| anyhow::anyhow!("#{id} is not a canvas"))
}

/// Top of the document body relative to the viewport; negative once scrolled.
pub fn body_top() -> anyhow::Result<f64> {
    let body = document()?.body().context("document has no body")?;
    Ok(body.get_bounding_client_rect().top())
}

/// Points the anchor at the bundled document.
pub fn link_document(link: &DocumentLink) -> anyhow::Result<()> {
    let anchor = document()?
        .get_element_by_id(&link.anchor_id)
        .with_context(|| format!("no element #{}", link.anchor_id))?;
    let url = resources::texture::format_url(&link.asset)?;
    anchor.set_attribute("href", url.as_str()).map_err(js_error)
}

/// Removes the element if the page has it.
pub fn remove_element(id: &str) -> anyhow::Result<()> {
    if let Some(element) = document()?.get_element_by_id(id) {
        element.remove();
    }
    Ok(())
}

pub(crate) fn listen_scroll(proxy: EventLoopProxy<FlowEvent>) -> anyhow::Result<()> {
    let on_scroll = Closure::<dyn FnMut()>::new(move || match body_top() {
        Ok(top) => {
            if proxy.send_event(FlowEvent::Scroll(top)).is_err() {
                log::debug!("Event loop closed, dropping scroll offset");
            }
        }
        Err(e) => log::warn!("{:#}", e),
    });
    window()?
        .add_event_listener_with_callback("scroll", on_scroll.as_ref().unchecked_ref())
        .map_err(js_error)?;
    on_scroll.forget();
    Ok(())
}

/// Keeps the canvas the size of the viewport. The resulting `Resized`
/// event drives the gallery's resize handling.
pub fn listen_resize(target: Arc<Window>) -> anyhow::Result<()> {
    let fit = move || -> anyhow::Result<()> {
        let page = window()?;
        let width = page.inner_width().map_err(js_error)?.as_f64().unwrap_or(0.0);
        let height = page.inner_height().map_err(js_error)?.as_f64().unwrap_or(0.0);
        let _ = target.request_inner_size(LogicalSize::new(width, height));
        Ok(())
    };
    fit()?;

    let on_resize = Closure::<dyn FnMut()>::new(move || {
        if let Err(e) = fit() {
            log::warn!("{:#}", e);
        }
    });
    window()?
        .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
        .map_err(js_error)?;
    on_resize.forget();
    Ok(())
}

/// Frame statistics overlay appended to the body in debug builds.
pub struct StatsPanel {
    element: web_sys::HtmlElement,
}

impl StatsPanel {
    pub fn new() -> anyhow::Result<Self> {
        let document = document()?;
        let element = document
            .create_element("div")
            .map_err(js_error)?
            .dyn_into::<web_sys::HtmlElement>()
            .map_err(|_| anyhow::anyhow!("created element is not an HtmlElement"))?;
        element.set_id("stats");
        element
            .set_attribute(
                "style",
                "position:fixed;top:0;left:0;padding:4px 8px;background:rgba(0,0,0,0.6);\
                 color:#0f0;font:12px monospace;z-index:10000",
            )
            .map_err(js_error)?;
        document
            .body()
            .context("document has no body")?
            .append_child(&element)
            .map_err(js_error)?;
        Ok(Self { element })
    }

    pub fn show(&self, sample: StatsSample) {
        self.element
            .set_text_content(Some(&format!("{:.0} FPS ({:.1} ms)", sample.fps, sample.frame_ms)));
    }
}
