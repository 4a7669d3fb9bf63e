//! Texture and material resolution
//!
//! Runs before the graph is built. Textures become shared handles with their
//! loads already issued; materials capture those handles, so pixels that
//! arrive later show up without recompiling anything.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use super::document::{MaterialDef, MaterialDefs, Shading, TextureDefs};
use crate::assets::{LoadRequest, TextureLoader};
use crate::foundation::math::Vec2;
use crate::render::color::Color;
use crate::render::material::{Material, Side};
use crate::render::texture::{resolve_path, TextureHandle, TextureSlot};

/// Create a handle per texture and issue its base and mipmap loads
///
/// Relative paths are resolved against `assets_dir`.
pub fn resolve_textures(
    defs: &TextureDefs,
    loader: &dyn TextureLoader,
    assets_dir: &Path,
) -> HashMap<String, TextureHandle> {
    defs.iter()
        .map(|(id, def)| {
            let path = resolve_path(assets_dir, &def.filepath);

            let handle = if def.is_video {
                log::debug!("Texture '{}': video {:?}", id, path);
                TextureHandle::video(id.as_str(), path)
            } else {
                let handle = TextureHandle::image(id.as_str(), &path);
                loader.request(LoadRequest::new(path, &handle, TextureSlot::Base));

                let mut explicit_levels = 0;
                for (level, mip_path) in def.mipmaps() {
                    loader.request(LoadRequest::new(
                        resolve_path(assets_dir, mip_path),
                        &handle,
                        TextureSlot::Mipmap(level),
                    ));
                    explicit_levels += 1;
                }
                if explicit_levels > 0 {
                    handle.set_generate_mipmaps(false);
                }

                log::debug!("Texture '{}': {} load(s) issued", id, explicit_levels + 1);
                handle
            };

            (id.clone(), handle)
        })
        .collect()
}

/// Build a shared material record per definition
pub fn resolve_materials(
    defs: &MaterialDefs,
    textures: &HashMap<String, TextureHandle>,
) -> HashMap<String, Arc<Material>> {
    defs.iter()
        .map(|(id, def)| (id.clone(), Arc::new(build_material(id, def, textures))))
        .collect()
}

fn build_material(id: &str, def: &MaterialDef, textures: &HashMap<String, TextureHandle>) -> Material {
    let lookup = |field: &str, reference: &Option<String>| {
        let reference = reference.as_deref()?;
        let texture = textures.get(reference).cloned();
        if texture.is_none() {
            log::warn!("Material '{}': {} '{}' does not name a texture", id, field, reference);
        }
        texture
    };

    let mut material = Material::new(id)
        .with_color(def.color.into())
        .with_opacity(def.opacity)
        .with_side(if def.twosided { Side::Double } else { Side::Front })
        .with_flat_shading(def.shading == Some(Shading::Flat));

    material.specular = def.specular.map_or(material.specular, Color::from);
    material.emissive = def.emissive.map_or(material.emissive, Color::from);
    material.shininess = def.shininess;
    material.transparent = def.transparent;
    material.wireframe = def.wireframe;
    material.map = lookup("textureref", &def.textureref);
    material.bump_map = lookup("bumpref", &def.bumpref);
    material.bump_scale = def.bumpscale;
    material.specular_map = lookup("specularref", &def.specularref);
    material.uv_repeat = Vec2::new(repeat(def.texlength_s), repeat(def.texlength_t));

    material
}

/// One tile per `length` world units
fn repeat(length: Option<f32>) -> f32 {
    match length {
        Some(length) if length.abs() > f32::EPSILON => 1.0 / length,
        _ => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{DeferredLoader, ImageData};
    use crate::render::texture::LoadStatus;
    use approx::assert_relative_eq;
    use serde_json::json;
    use std::path::PathBuf;

    fn textures(value: serde_json::Value) -> TextureDefs {
        serde_json::from_value(value).unwrap()
    }

    fn materials(value: serde_json::Value) -> MaterialDefs {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_image_texture_issues_base_and_mipmap_loads() {
        let loader = DeferredLoader::new();
        let handles = resolve_textures(
            &textures(json!({
                "wood": {"filepath": "wood.png", "mipmap0": "wood_256.png", "mipmap1": "wood_128.png"},
                "plain": {"filepath": "/abs/plain.png"}
            })),
            &loader,
            Path::new("scenes"),
        );

        assert_eq!(loader.pending(), 4);
        assert!(!handles["wood"].read().generate_mipmaps);
        assert!(handles["plain"].read().generate_mipmaps);
        assert_eq!(handles["wood"].image_path(), Some(PathBuf::from("scenes/wood.png")));
        assert_eq!(handles["plain"].image_path(), Some(PathBuf::from("/abs/plain.png")));
    }

    #[test]
    fn test_video_texture_issues_no_load() {
        let loader = DeferredLoader::new();
        let handles = resolve_textures(
            &textures(json!({"screen": {"filepath": "clip.mp4", "isVideo": true}})),
            &loader,
            Path::new(""),
        );

        assert_eq!(loader.pending(), 0);
        let screen = handles["screen"].read();
        assert_eq!(screen.status, LoadStatus::Loaded);
        match &screen.source {
            crate::render::texture::TextureSource::Video(video) => {
                assert!(video.looping && video.autoplay && video.muted);
            }
            other => panic!("expected video source, got {other:?}"),
        }
    }

    #[test]
    fn test_material_fields_and_repeat() {
        let loader = DeferredLoader::new();
        let handles = resolve_textures(&textures(json!({"wood": {"filepath": "wood.png"}})), &loader, Path::new(""));
        let resolved = resolve_materials(
            &materials(json!({
                "table": {
                    "color": {"r": 0.5, "g": 0.25, "b": 0.0, "a": 1.0},
                    "specular": {"r": 0.1, "g": 0.1, "b": 0.1},
                    "shininess": 10, "opacity": 0.5, "transparent": true,
                    "shading": "flat", "twosided": true,
                    "textureref": "wood", "texlength_s": 2.0, "texlength_t": 0.5,
                    "bumpref": "missing"
                }
            })),
            &handles,
        );

        let table = &resolved["table"];
        assert_eq!(table.color, Color::new(0.5, 0.25, 0.0));
        assert!(table.flat_shading);
        assert!(table.is_double_sided());
        assert!(table.transparent);
        assert_relative_eq!(table.opacity, 0.5);
        assert_relative_eq!(table.uv_repeat, Vec2::new(0.5, 2.0));
        assert!(table.map.as_ref().unwrap().ptr_eq(&handles["wood"]));
        assert!(table.bump_map.is_none());
    }

    #[test]
    fn test_late_mipmap_visible_through_material() {
        let loader = DeferredLoader::new();
        let handles = resolve_textures(
            &textures(json!({"wood": {"filepath": "wood.png", "mipmap2": "wood_64.png"}})),
            &loader,
            Path::new(""),
        );
        let resolved = resolve_materials(
            &materials(json!({"table": {"color": {"r": 1, "g": 1, "b": 1}, "textureref": "wood"}})),
            &handles,
        );

        let map = resolved["table"].map.clone().unwrap();
        assert!(!map.is_ready());
        assert!(!map.has_mipmap(2));

        loader.complete_all(|_| Ok(ImageData::solid_color(4, 4, [255, 0, 0, 255])));

        assert!(map.is_ready());
        assert!(map.has_mipmap(2));
        assert!(!map.has_mipmap(0));
    }
}
