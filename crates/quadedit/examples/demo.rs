//! Demo session showing basic quadedit usage.
//!
//! Seeds the default cube, picks a face, edits it numerically, moves the
//! whole model and prints a relative export.
//!
//! Run with `RUST_LOG=debug` to see the session log.

use quadedit::*;

fn main() -> Result<()> {
    init_logging();

    let editor = Editor::default();

    // A stand-in for a view: report every model change
    let _view = editor.model().subscribe(|model| {
        println!("model changed: {} faces, centroid {}", model.len(), model.centroid());
    });
    let _inspector = editor.selection().subscribe(|selected| match selected {
        Some(face) => println!("selected {}", face.id()),
        None => println!("selection cleared"),
    });

    // Click the middle of a 800x600 viewport looking down -Z at the cube
    let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 6.0), Vec3::ZERO, Vec3::Y);
    let projection = Mat4::perspective_rh(45f32.to_radians(), 800.0 / 600.0, 0.1, 100.0);
    let center = Vec2::new(400.0, 300.0);
    editor.click(center, center, UVec2::new(800, 600), (projection * view).inverse());

    // Pull the top-right corner of the picked face outward
    editor.set_selected_coordinate(2, Axis::Z, 1.5)?;
    editor.step_selected_coordinate(2, Axis::X, 3)?;

    editor.translate_all(Vec3::new(0.0, 1.0, 0.0));

    let settings = ExportSettings::relative_to(editor.model().centroid());
    editor.export_json(&settings, std::io::stdout())?;
    println!();

    Ok(())
}
