//! Convert the bundled walker fixture and write its clips as JSON.
//!
//! ```sh
//! RUST_LOG=debug cargo run -p bonebake-core --example convert_walker -- /tmp/walker
//! ```

use anyhow::{Context, Result};
use bonebake_core::{
    parse_atlas_json, parse_export_json, ConvertConfig, ConvertInput, Converter, JsonDirSink,
};
use bonebake_test_fixtures as fixtures;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let out_dir = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "target/walker-clips".to_string());

    let export = parse_export_json(&fixtures::exports::json("walker")?)
        .context("parse walker export")?;
    let atlas = parse_atlas_json(&fixtures::atlases::json("walker")?)
        .context("parse walker atlas")?;
    let input = ConvertInput::from_export(export, Some(atlas));

    let converter = Converter::new(ConvertConfig {
        parallel: true,
        ..ConvertConfig::default()
    });
    let mut sink = JsonDirSink::new(&out_dir);
    let report = converter.run(&input, &mut sink)?;

    for clip in &report.clips {
        println!("{}", sink.clip_path(clip).display());
    }
    for warning in report.diagnostics.iter() {
        println!("warning: {warning}");
    }
    let pose = serde_json::to_string_pretty(&report.rest_pose)?;
    std::fs::write(sink.dir().join("rest_pose.json"), pose).context("write rest pose")?;
    Ok(())
}
