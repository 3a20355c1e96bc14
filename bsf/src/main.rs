use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use log::{info, warn};
use rand::SeedableRng;
use rand::prelude::SmallRng;

use bsf::config::BSFConfig;
use bsf::io;
use bsf::io::cli::Cli;
use bsf::io::output::BSFOutput;
use bsf::opt::bsf_color::BSFOptimizerColor;
use bsf::opt::bsf_gray::BSFOptimizerGray;
use stringart_rs::render::{RGB_TINTS, render_color, render_grayscale, scale_nails};

fn main() -> Result<()> {
    let args = Cli::parse();
    io::init_logger(args.log_level)?;

    let config = match args.config_file {
        None => {
            warn!("[MAIN] No config file provided, use --config-file to provide a custom config");
            BSFConfig::default()
        }
        Some(config_file) => io::read_config(&config_file)?,
    };

    info!("Successfully parsed BSFConfig: {config:?}");

    if !args.output_folder.exists() {
        fs::create_dir_all(&args.output_folder)
            .with_context(|| format!("could not create output folder: {:?}", args.output_folder))?;
    }
    let instructions_path = args.output_folder.join("instructions.txt");

    // the physical thread chains across sections: every run starts at the
    // nail the previous section's pull order ended on
    let mut handover_idx = 0;
    for input_file in &args.input_files {
        let stem = input_file
            .file_stem()
            .and_then(|s| s.to_str())
            .with_context(|| format!("input file has no usable name: {input_file:?}"))?
            .to_owned();
        info!("[MAIN] processing {stem}");

        handover_idx = match config.color {
            true => main_color(
                input_file,
                &stem,
                config,
                &args.output_folder,
                &instructions_path,
                handover_idx,
            )?,
            false => main_gray(
                input_file,
                &stem,
                config,
                &args.output_folder,
                &instructions_path,
                handover_idx,
            )?,
        };
    }
    Ok(())
}

fn main_gray(
    input_file: &Path,
    stem: &str,
    config: BSFConfig,
    output_folder: &PathBuf,
    instructions_path: &Path,
    handover_idx: usize,
) -> Result<usize> {
    let target = io::read_target(input_file, config.working_side)?;
    let mut optimizer = BSFOptimizerGray::new(target, config, rng_for(&config))?;
    let (result, next_handover) = optimizer.solve_section(handover_idx)?;

    let export_shape = (config.export_side, config.export_side);
    let scaled_nails = scale_nails(&optimizer.layout.nails, optimizer.layout.shape, export_shape)?;
    let render = render_grayscale(
        &result.pull_order,
        &scaled_nails,
        export_shape,
        export_strength(&config),
    )?;
    io::write_canvas_png(&render, &output_folder.join(format!("{stem}_string_art.png")))?;

    io::append_instructions(instructions_path, stem, &result.pull_order)?;
    let output = BSFOutput::new(
        config,
        optimizer.layout.len(),
        vec![result.stop],
        &[result.pull_order.as_slice()],
    );
    io::write_json(&output, &output_folder.join(format!("sol_{stem}.json")))?;

    Ok(next_handover)
}

fn main_color(
    input_file: &Path,
    stem: &str,
    config: BSFConfig,
    output_folder: &PathBuf,
    instructions_path: &Path,
    handover_idx: usize,
) -> Result<usize> {
    let targets = io::read_channel_targets(input_file, config.working_side)?;
    let mut optimizer = BSFOptimizerColor::new(targets, config, rng_for(&config))?;
    let (results, next_handover) = optimizer.solve_section(handover_idx)?;

    let export_shape = (config.export_side, config.export_side);
    let scaled_nails = scale_nails(&optimizer.layout.nails, optimizer.layout.shape, export_shape)?;
    let pull_orders = [
        results[0].pull_order.clone(),
        results[1].pull_order.clone(),
        results[2].pull_order.clone(),
    ];
    let render = render_color(
        &pull_orders,
        &scaled_nails,
        export_shape,
        RGB_TINTS,
        export_strength(&config),
    )?;
    io::write_color_png(&render, &output_folder.join(format!("{stem}_string_art.png")))?;

    for (channel, result) in ["R", "G", "B"].iter().zip(&results) {
        io::append_instructions(
            instructions_path,
            &format!("{stem}.{channel}"),
            &result.pull_order,
        )?;
    }
    let output = BSFOutput::new(
        config,
        optimizer.layout.len(),
        results.iter().map(|r| r.stop).collect(),
        &[
            results[0].pull_order.as_slice(),
            results[1].pull_order.as_slice(),
            results[2].pull_order.as_slice(),
        ],
    );
    io::write_json(&output, &output_folder.join(format!("sol_{stem}.json")))?;

    Ok(next_handover)
}

fn export_strength(config: &BSFConfig) -> f32 {
    match config.dark_background {
        true => config.export_strength,
        false => -config.export_strength,
    }
}

fn rng_for(config: &BSFConfig) -> SmallRng {
    match config.prng_seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    }
}
