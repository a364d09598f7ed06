/// Example: Load an OBJ model and show it as every table in a small room
///
/// Usage: cargo run --example load_obj -- path/to/model.obj [scale]

use std::env;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use roomview_core::obj::load_obj_with;
use roomview_core::{
    vec3, FurnitureModel, FurnitureType, MeshFit, ModelCache, RenderSettings, Room,
};
use roomview_terminal::TerminalApp;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut models = ModelCache::new();
    if args.len() < 2 {
        eprintln!("Usage: {} <obj-file> [scale]", args[0]);
        eprintln!("\nNo OBJ file provided, using primitive shapes...");
    } else {
        let obj_path = Path::new(&args[1]);
        let scale = match args.get(2) {
            Some(s) => s.parse::<f64>().context("scale must be a number")?,
            None => 1.0,
        };

        println!("Loading OBJ file: {}", obj_path.display());
        let source = fs::read_to_string(obj_path)
            .with_context(|| format!("Failed to read OBJ file {}", obj_path.display()))?;
        let dir = obj_path.parent().unwrap_or(Path::new("."));
        let mesh = load_obj_with(&source, |lib| fs::read_to_string(dir.join(lib)).ok())
            .context("Failed to parse OBJ")?;

        println!(
            "Loaded {} faces, {} materials",
            mesh.faces.len(),
            mesh.materials.len()
        );
        models.insert(
            FurnitureType::Table,
            FurnitureModel::new(mesh, MeshFit::new(scale, vec3(0.0, 0.0, 0.0))),
        );
    }

    let mut room = Room::new(400, 300, 250);
    room.add_furniture("Model", FurnitureType::Table, vec3(0.0, 37.5, 0.0));

    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let (cols, rows) = crossterm::terminal::size()?;
    let mut app = TerminalApp::new(room, RenderSettings::default(), models, false, cols, rows);
    app.run()?;

    println!("Thank you for using Roomview!");
    Ok(())
}
