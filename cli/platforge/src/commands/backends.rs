//! `platforge backends`: list compiler backends.

use anyhow::Result;
use platforge_compile::BackendRegistry;

pub fn run() -> Result<()> {
    let registry = BackendRegistry::with_defaults();
    println!("Compiler backends:");
    println!();
    for backend in registry.iter() {
        println!("  {:<10} {}", backend.name(), backend.description());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #[test]
    fn lists_backends() {
        super::run().unwrap();
    }
}
