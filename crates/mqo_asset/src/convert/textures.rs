use anyhow::{Context, Result};
use log::{debug, info};
use mqo_format::Scene;
use std::{fs, path::Path};

/// Copies every texture referenced by `scene` from `source_dir` to `target_dir`, keeping the
/// relative file names used in the materials
pub(crate) fn copy_textures(source_dir: &Path, target_dir: &Path, scene: &Scene) -> Result<()> {
    for texture in scene.texture_files() {
        let source = source_dir.join(texture);
        let target = target_dir.join(texture);

        if source == target {
            debug!("Texture already in place: {}", target.display());
            continue;
        }

        if let Some(parent) = target.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Could not create texture folder: {}", parent.display())
                })?;
            }
        }

        fs::copy(&source, &target).with_context(|| {
            format!(
                "Could not copy texture {} to {}",
                source.display(),
                target.display()
            )
        })?;
        info!("Copied texture: {}", target.display());
    }

    Ok(())
}
