//! Head model download.

use crate::core::mesh::HeadMesh;
use instant::Instant;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

pub async fn fetch_bytes(url: &str) -> anyhow::Result<Vec<u8>> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let opts = web::RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(web::RequestMode::Cors);
    let request = web::Request::new_with_str_and_init(url, &opts)
        .map_err(|e| anyhow::anyhow!("bad request for {url}: {:?}", e))?;
    let resp: web::Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| anyhow::anyhow!("fetch {url}: {:?}", e))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    if !resp.ok() {
        anyhow::bail!("fetch {url}: HTTP {}", resp.status());
    }
    let buf = JsFuture::from(resp.array_buffer().map_err(|e| anyhow::anyhow!("{:?}", e))?)
        .await
        .map_err(|e| anyhow::anyhow!("read body of {url}: {:?}", e))?;
    Ok(js_sys::Uint8Array::new(&buf).to_vec())
}

/// Download and parse the head mesh.
pub async fn load_head(url: &str) -> anyhow::Result<HeadMesh> {
    let started = Instant::now();
    let bytes = fetch_bytes(url).await?;
    let mesh = HeadMesh::from_glb(&bytes)?;
    log::info!(
        "[asset] head loaded: {} vertices, {} KiB in {:.0} ms",
        mesh.vertex_count(),
        bytes.len() / 1024,
        started.elapsed().as_secs_f64() * 1000.0
    );
    Ok(mesh)
}
