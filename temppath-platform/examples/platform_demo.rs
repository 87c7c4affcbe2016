//! Demo showing the temp platform boundary

use temppath_platform::{default_temp_root, UniqueName};

fn main() -> std::io::Result<()> {
    println!("=== Temp Platform Demo ===");

    let platform = temppath_platform::current();
    println!("Platform: {}", platform.name());
    println!("Temp root: {}", default_temp_root().display());

    let name = UniqueName::default().with_prefix(Some("demo-"));
    let dir = platform.create_unique_dir(&name)?;
    println!("Created: {}", dir.display());

    platform.remove_tree(&dir)?;
    println!("Removed: {} (exists: {})", dir.display(), platform.exists(&dir));

    Ok(())
}
