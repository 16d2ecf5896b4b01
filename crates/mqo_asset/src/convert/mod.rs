mod meta;
mod textures;

use anyhow::{Context, Result};
use log::{info, warn};
use mqo_format::{obj, parser, ParseMode, Scene};
use std::{io::Write, path::Path};

use crate::utils;

use self::meta::MqoMeta;

fn parse(path: &Path, meta: &MqoMeta) -> Result<Scene> {
    let data = std::fs::read(path)
        .with_context(|| format!("Could not read file: {}", path.display()))?;
    let parsed = parser::parse_with_mode(&data, meta.mode)
        .with_context(|| format!("Could not parse {}", path.display()))?;

    if !parsed.diagnostics.is_empty() {
        let structural = parsed
            .diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.error.is_structural())
            .count();
        warn!(
            "Skipped {} malformed blocks in {} ({} structural, {} in numbers or face counts)",
            parsed.diagnostics.len(),
            path.display(),
            structural,
            parsed.diagnostics.len() - structural
        );
    }

    Ok(parsed.scene)
}

/// Writes `<name>.mtl` and `<name>.obj` next to each other into `output_dir`
fn save(path: &Path, output_dir: &Path, scene: &Scene) -> Result<()> {
    let file_name = utils::file_name(path)?;
    let mtl_path = utils::combine_path(output_dir, file_name, "mtl");
    let obj_path = utils::combine_path(output_dir, file_name, "obj");

    let mut mtl = utils::create_file(&mtl_path)?;
    obj::write_mtl(&mut mtl, scene)
        .and_then(|_| Ok(mtl.flush()?))
        .with_context(|| format!("Could not write data to file: {}", mtl_path.display()))?;

    let mtl_name = format!("{}.mtl", file_name);
    let mut geometry = utils::create_file(&obj_path)?;
    obj::write_obj(&mut geometry, scene, &mtl_name)
        .and_then(|_| Ok(geometry.flush()?))
        .with_context(|| format!("Could not write data to file: {}", obj_path.display()))?;

    Ok(())
}

/// Loads `<model>.toml` next to the model, falling back to a folder scoped `mqo.toml` and then to
/// the default meta
fn parse_meta(path: &Path) -> Result<MqoMeta> {
    let dir = path
        .parent()
        .with_context(|| format!("Path terminates in root or prefix: {}", path.display()))?;
    let meta_file = utils::file_name(path)?;
    let path = utils::combine_path(dir, meta_file, "toml");

    let meta: MqoMeta;
    if path.exists() && path.is_file() {
        // load meta
        meta = MqoMeta::parse(&path)?;
    } else {
        // check if folder scoped meta exists
        let path = utils::combine_path(dir, "mqo", "toml");
        if path.exists() && path.is_file() {
            // load meta
            meta = MqoMeta::parse(&path)?;
        } else {
            // create default meta
            meta = MqoMeta::default();
        }
    }

    Ok(meta)
}

pub(crate) fn process(path: &Path, output_dir: &Path, strict: bool) -> Result<()> {
    info!("Processing Metasequoia `.mqo`-file: `{}`", path.display());
    let mut meta = parse_meta(path)?;
    if strict {
        meta.mode = ParseMode::Strict;
    }

    let scene = parse(path, &meta)?;
    save(path, output_dir, &scene)?;

    if meta.copy_textures {
        let source_dir = path.parent().unwrap_or_else(|| Path::new(""));
        textures::copy_textures(source_dir, output_dir, &scene)?;
    }

    Ok(())
}
