/// Example: Load an OBJ file and report what the parser produced
///
/// Usage: cargo run --example inspect_obj -- path/to/file.obj
use std::env;

use anyhow::{Context, Result};
use orrery_core::obj;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let path = match args.get(1) {
        Some(path) => path.clone(),
        None => {
            eprintln!("Usage: {} <obj-file>", args[0]);
            eprintln!("\nNo OBJ file provided, using assets/planet.obj...");
            "assets/planet.obj".to_string()
        }
    };

    println!("Loading OBJ file: {}", path);

    let data = obj::load_obj_data(&path).with_context(|| format!("failed to load {}", path))?;
    let mesh = data.expand();
    let indexed = data.indexed();

    let radius = mesh
        .positions()
        .iter()
        .map(|p| p.coords.norm())
        .fold(0.0f32, f32::max);

    println!("Triangles:        {}", mesh.triangle_count());
    println!("Corners:          {}", mesh.len());
    println!("Unique corners:   {}", indexed.vertices.len());
    println!("Indexed faces:    {}", indexed.triangle_count());
    println!("Bounding radius:  {:.3}", radius);
    Ok(())
}
