//! `conemap check-config`: load and validate `conemap.toml`.

use conemap_config::MapperConfig;

use crate::GlobalArgs;

/// Runs the `conemap check-config` command.
///
/// Returns exit code 0 when the configuration loads and validates; load
/// failures are returned as errors.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = conemap_config::load_config(&global.config)?;
    if !global.quiet {
        eprintln!("   Checked {}", global.config.display());
        println!("{}", summarize(&config));
    }
    Ok(0)
}

fn summarize(config: &MapperConfig) -> String {
    let table = config
        .delay
        .table
        .iter()
        .map(|d| format!("{d:.3}"))
        .collect::<Vec<_>>()
        .join(", ");
    let output = match config.required.output {
        Some(t) => format!("{t:.3} ns"),
        None => "from network".to_string(),
    };
    format!(
        "max cut size:    {}\ncone capacity:   {}\ndelay classes:   {} [{table}]\noutput required: {output}",
        config.mapper.max_cut_size,
        config.mapper.cone_capacity,
        config.delay.table.len(),
    )
}
