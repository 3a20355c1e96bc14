use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, GrayImage, Luma, Rgb, RgbImage};
use itertools::Itertools;
use log::{LevelFilter, info};
use ndarray::{Array2, Array3};
use serde::Serialize;
use serde::de::DeserializeOwned;

use stringart_rs::canvas::Canvas;

use crate::EPOCH;

pub mod cli;
pub mod output;

// Rec.601 luma weights, matching the usual grayscale conversion
const LUMA_WEIGHTS: [f32; 3] = [0.2989, 0.5870, 0.1140];

/// The original generator dims the grayscale target slightly, leaving
/// headroom so the densest regions stay reachable by accumulated strokes.
const TARGET_DIM_FACTOR: f32 = 0.9;

/// Loads an image and prepares the grayscale target: center-crop to the
/// largest square, resize to `working_side`, convert to luma and dim.
pub fn read_target(path: &Path, working_side: usize) -> Result<Canvas> {
    let img = open_square(path, working_side)?;
    let rgb = img.to_rgb8();

    let mut pixels = Array2::zeros((working_side, working_side));
    for (x, y, p) in rgb.enumerate_pixels() {
        let [r, g, b] = p.0;
        let luma = (LUMA_WEIGHTS[0] * r as f32
            + LUMA_WEIGHTS[1] * g as f32
            + LUMA_WEIGHTS[2] * b as f32)
            / 255.0;
        pixels[[y as usize, x as usize]] = luma * TARGET_DIM_FACTOR;
    }
    Canvas::from_pixels(pixels)
}

/// Loads an image and prepares one target per RGB channel (undimmed),
/// cropped and resized as in [`read_target`].
pub fn read_channel_targets(path: &Path, working_side: usize) -> Result<[Canvas; 3]> {
    let img = open_square(path, working_side)?;
    let rgb = img.to_rgb8();

    let mut channels = [(); 3].map(|_| Array2::zeros((working_side, working_side)));
    for (x, y, p) in rgb.enumerate_pixels() {
        for (k, channel) in channels.iter_mut().enumerate() {
            channel[[y as usize, x as usize]] = p.0[k] as f32 / 255.0;
        }
    }

    let [r, g, b] = channels;
    Ok([
        Canvas::from_pixels(r)?,
        Canvas::from_pixels(g)?,
        Canvas::from_pixels(b)?,
    ])
}

fn open_square(path: &Path, side: usize) -> Result<DynamicImage> {
    let img = image::open(path).with_context(|| format!("could not open image: {path:?}"))?;
    let (w, h) = img.dimensions();
    let short = u32::min(w, h);
    let cropped = img.crop_imm((w - short) / 2, (h - short) / 2, short, short);
    Ok(cropped.resize_exact(side as u32, side as u32, FilterType::Triangle))
}

pub fn write_canvas_png(canvas: &Canvas, path: &Path) -> Result<()> {
    let (h, w) = canvas.shape();
    let img = GrayImage::from_fn(w as u32, h as u32, |x, y| {
        Luma([to_u8(canvas.get(y as usize, x as usize))])
    });
    img.save(path)
        .with_context(|| format!("could not write render: {path:?}"))?;
    info!("render written to {path:?}");
    Ok(())
}

pub fn write_color_png(pixels: &Array3<f32>, path: &Path) -> Result<()> {
    let (h, w) = (pixels.shape()[0], pixels.shape()[1]);
    let img = RgbImage::from_fn(w as u32, h as u32, |x, y| {
        let (r, c) = (y as usize, x as usize);
        Rgb([
            to_u8(pixels[[r, c, 0]]),
            to_u8(pixels[[r, c, 1]]),
            to_u8(pixels[[r, c, 2]]),
        ])
    });
    img.save(path)
        .with_context(|| format!("could not write render: {path:?}"))?;
    info!("render written to {path:?}");
    Ok(())
}

fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("could not create output file: {path:?}"))?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)
        .with_context(|| format!("could not write output file: {path:?}"))?;
    info!("output written to {path:?}");
    Ok(())
}

pub fn read_config<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file =
        File::open(path).with_context(|| format!("could not open config file: {path:?}"))?;
    serde_json::from_reader(BufReader::new(file)).context("incorrect config file format")
}

/// Appends one section's pull order to the instructions file,
/// as 1-based nail indices joined with `-`.
pub fn append_instructions(path: &Path, section: &str, pull_order: &[usize]) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("could not open instructions file: {path:?}"))?;
    writeln!(file, "{section}")?;
    writeln!(file, "{}\n", pull_order.iter().map(|i| i + 1).join("-"))?;
    Ok(())
}

pub fn init_logger(level_filter: LevelFilter) -> Result<()> {
    fern::Dispatch::new()
        // Perform allocation-free log formatting
        .format(|out, message, record| {
            let handle = std::thread::current();
            let thread_name = handle.name().unwrap_or("-");

            let duration = EPOCH.elapsed();
            let sec = duration.as_secs() % 60;
            let min = (duration.as_secs() / 60) % 60;
            let hours = (duration.as_secs() / 60) / 60;

            let prefix = format!(
                "[{}] [{:0>2}:{:0>2}:{:0>2}] <{}>",
                record.level(),
                hours,
                min,
                sec,
                thread_name,
            );

            out.finish(format_args!("{prefix:<27}{message}"))
        })
        .level(level_filter)
        .chain(std::io::stdout())
        .apply()
        .context("could not initialize logger")?;
    Ok(())
}
