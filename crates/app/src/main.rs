//! Entry point for Perun3D: logging + CLI flags + model load + run.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use asset::assemble::build_model;
use asset::obj::load_model_from_path;
use asset::texture::TextureCache;

fn parse_backend_arg() -> wgpu::Backends {
    // Accept: --gpu-backend=auto|vulkan|dx12|metal|gl
    let mut backends = wgpu::Backends::all(); // default = auto
    for arg in std::env::args() {
        if let Some(val) = arg.strip_prefix("--gpu-backend=") {
            backends = match val.to_ascii_lowercase().as_str() {
                "auto" => wgpu::Backends::all(),
                "vulkan" | "vk" => wgpu::Backends::VULKAN,
                "dx12" | "d3d12" => wgpu::Backends::DX12,
                "metal" | "mtl" => wgpu::Backends::METAL,
                "gl" | "opengl" | "gles" => wgpu::Backends::GL,
                other => {
                    log::warn!("Unknown backend '{other}', falling back to auto.");
                    wgpu::Backends::all()
                }
            };
        }
    }
    backends
}

fn parse_spin_arg() -> bool {
    // --spin[=on|off], default off
    for arg in std::env::args() {
        if arg == "--spin" {
            return true;
        }
        if let Some(val) = arg.strip_prefix("--spin=") {
            return matches!(
                val.to_ascii_lowercase().as_str(),
                "1" | "true" | "on" | "yes"
            );
        }
    }
    false
}

fn parse_size_args() -> (u32, u32) {
    let mut w: Option<u32> = None;
    let mut h: Option<u32> = None;

    for arg in std::env::args() {
        if let Some(v) = arg.strip_prefix("--size=") {
            if let Some((sw, sh)) = v.split_once('x').or_else(|| v.split_once('X')) {
                if let (Ok(pw), Ok(ph)) = (sw.parse::<u32>(), sh.parse::<u32>()) {
                    w = Some(pw);
                    h = Some(ph);
                }
            }
        } else if let Some(v) = arg.strip_prefix("--width=") {
            if let Ok(pw) = v.parse::<u32>() {
                w = Some(pw);
            }
        } else if let Some(v) = arg.strip_prefix("--height=") {
            if let Ok(ph) = v.parse::<u32>() {
                h = Some(ph);
            }
        }
    }

    (w.unwrap_or(1280).max(1), h.unwrap_or(720).max(1))
}

/// First non-flag argument is the OBJ model path.
fn parse_model_arg() -> Option<PathBuf> {
    std::env::args()
        .skip(1)
        .find(|arg| !arg.starts_with("--"))
        .map(PathBuf::from)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Some(model_path) = parse_model_arg() else {
        bail!("usage: app <model.obj> [--gpu-backend=...] [--size=WxH] [--spin]");
    };
    let backends = parse_backend_arg();
    let spin = parse_spin_arg();
    let (width, height) = parse_size_args();

    log::info!(
        "Starting Perun3D. Model: {}, backend: {:?}, window_size={}x{}",
        model_path.display(),
        backends,
        width,
        height
    );

    let mut obj = load_model_from_path(&model_path)
        .with_context(|| format!("loading {}", model_path.display()))?;
    log::info!(
        "parsed {} object(s), {} material(s)",
        obj.objects.len(),
        obj.materials.len()
    );

    let base_dir = model_path.parent().unwrap_or(Path::new("."));
    let mut textures = TextureCache::new();
    let model = build_model(&mut obj, &mut textures, base_dir)
        .with_context(|| format!("assembling {}", model_path.display()))?;
    log::info!(
        "assembled {} mesh(es): {} vertices, {} triangles, {} texture(s)",
        model.meshes.len(),
        model.vertex_count(),
        model.triangle_count(),
        textures.len()
    );

    platform::run(
        platform::RunOptions {
            backends,
            width,
            height,
            spin,
        },
        model,
    )?;

    log::info!("Graceful shutdown. Bye!");
    Ok(())
}
