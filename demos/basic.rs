//! Example: Basic usage of Trellis
//!
//! Builds a small form, flushes it, then changes a few things and flushes
//! again. Run with `RUST_LOG=debug` to watch the registry and dirty set.

use trellis::ui::{ContainerKind, NodeId, Size};
use trellis::{Application, Config};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let app = Application::new(config);
    println!("Trellis v{} initialized", trellis::VERSION);

    let (form, name, submit) = app.with_ui(|ui| -> anyhow::Result<_> {
        let form = ui.create_container(ContainerKind::VerticalLayout);
        let name = ui.create_component("TextField");
        let submit = ui.create_component("Button");
        ui.set_content(NodeId::ROOT, Some(form))?;
        ui.add_component(form, name)?;
        ui.add_component(form, submit)?;
        ui.set_caption(name, Some("Name"))?;
        ui.set_width(name, Size::FULL)?;
        Ok((form, name, submit))
    })??;

    let (out, summary) = app.flush_json(Vec::new())?;
    println!("Flush {}: {} connectors", summary.sync_id, summary.written);
    println!("{}", String::from_utf8(out)?);

    // The name field only gets a usable width once the form has one
    let invalid = app.with_ui(|ui| ui.invalid_layouts().len())?;
    println!("Invalid layouts before sizing the form: {}", invalid);

    app.with_ui(|ui| -> anyhow::Result<()> {
        ui.set_width(form, Size::px(320.0))?;
        ui.set_enabled(submit, false)?;
        Ok(())
    })??;

    let (out, summary) = app.flush_json(Vec::new())?;
    println!("Flush {}: {} connectors", summary.sync_id, summary.written);
    println!("{}", String::from_utf8(out)?);

    let ui = app.shutdown()?;
    println!(
        "Registered connectors: {}, name field initialized: {}",
        ui.registry().len(),
        ui.is_client_side_initialized(name)
    );
    Ok(())
}
