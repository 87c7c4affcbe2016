//! Showcasing the scoped temporary path guards.
//!
//! Run with `RUST_LOG=temppath=debug` to see every create and remove.

use std::fs;
use std::io::Write;
use temppath::{ConditionalTempDir, PathRemover, Scope, TempDirAllocator, TempFileOptions};

fn main() -> anyhow::Result<()> {
    temppath::tracing_init::init()?;

    println!("Default temp root: {}", temppath::default_temp_root().display());

    // A generated directory, removed on exit
    let mut work = TempDirAllocator::builder().prefix("demo-").build()?;
    let work_path = work.enter()?.to_path_buf();
    println!("Work directory: {}", work_path.display());

    // A supplied directory inside it, never removed by its own scope
    let mut cache = ConditionalTempDir::new(Some(work_path.join("cache")))?;
    let cache_path = cache.enter()?.to_path_buf();
    fs::write(cache_path.join("entry"), "cached")?;
    cache.exit()?;
    println!("Cache kept after exit: {}", cache_path.exists());

    // A file that outlives its handle
    let mut report = TempFileOptions::new()
        .dir(&work_path)
        .suffix(".txt")
        .delete(false)
        .create()?;
    report.write_all(b"report body\n")?;
    report.close()?;
    println!("Report: {}", report.path().display());

    // Remove the cache explicitly, then the whole work tree
    let mut remover = PathRemover::new(&cache_path)?;
    remover.enter()?;
    remover.exit()?;

    work.exit()?;
    println!("Work directory removed: {}", !work_path.exists());

    Ok(())
}
