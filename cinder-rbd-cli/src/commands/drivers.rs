use crate::cli::GlobalFlags;

pub fn execute(global: &GlobalFlags) -> anyhow::Result<()> {
    let registry = global.create_registry()?;
    for name in registry.available_drivers() {
        println!("{}", name);
    }
    Ok(())
}
