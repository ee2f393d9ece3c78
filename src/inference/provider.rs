//! Execution provider selection.
//!
//! GPU providers are compiled in through the `cuda`, `directml` and `coreml`
//! features. ONNX Runtime is loaded dynamically, so a compiled-in provider
//! can still be missing its runtime libraries. CUDA is only requested when
//! `libcudart` can be found on the library search path.

use crate::config::InferenceDevice;
use ort::ep::ExecutionProviderDispatch;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[cfg(target_os = "windows")]
const CUDA_RUNTIME_PATTERN: &str = "cudart64_*.dll";
#[cfg(target_os = "macos")]
const CUDA_RUNTIME_PATTERN: &str = "libcudart.*.dylib";
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const CUDA_RUNTIME_PATTERN: &str = "libcudart.so.*";

/// GPU providers this build can register, in selection order.
pub fn compiled_gpu_providers() -> Vec<&'static str> {
    let mut names = Vec::new();
    if cfg!(feature = "cuda") {
        names.push("CUDA");
    }
    if cfg!(feature = "directml") {
        names.push("DirectML");
    }
    if cfg!(feature = "coreml") {
        names.push("CoreML");
    }
    names
}

/// Providers to register for `device`, plus a label for logging.
///
/// An empty list means the default CPU provider. `Auto` falls back to CPU
/// silently, `Gpu` with a warning.
pub fn select_execution_providers(
    device: InferenceDevice,
) -> (Vec<ExecutionProviderDispatch>, &'static str) {
    if device == InferenceDevice::Cpu {
        info!("Requested device: CPU");
        return (Vec::new(), "CPU");
    }

    match first_gpu_provider() {
        Some((provider, name)) => {
            info!("{device}: selected {name} provider");
            (vec![provider], name)
        }
        None if device == InferenceDevice::Gpu => {
            warn!("--gpu requested but no GPU providers available, using CPU");
            (Vec::new(), "GPU (fallback to CPU)")
        }
        None => {
            info!("Auto mode: no GPU providers available, using CPU");
            (Vec::new(), "Auto (CPU)")
        }
    }
}

fn first_gpu_provider() -> Option<(ExecutionProviderDispatch, &'static str)> {
    cuda_provider()
        .or_else(directml_provider)
        .or_else(coreml_provider)
}

#[cfg(feature = "cuda")]
fn cuda_provider() -> Option<(ExecutionProviderDispatch, &'static str)> {
    use ort::ep::{CUDA, ExecutionProvider};

    if !is_cuda_available() {
        return None;
    }
    let cuda = CUDA::default();
    if cuda.is_available().unwrap_or(false) {
        return Some((cuda.build(), "CUDA"));
    }
    debug!("CUDA runtime found but the CUDA provider is not available");
    None
}

#[cfg(not(feature = "cuda"))]
fn cuda_provider() -> Option<(ExecutionProviderDispatch, &'static str)> {
    None
}

#[cfg(feature = "directml")]
fn directml_provider() -> Option<(ExecutionProviderDispatch, &'static str)> {
    use ort::ep::{DirectML, ExecutionProvider};

    let directml = DirectML::default();
    directml
        .is_available()
        .unwrap_or(false)
        .then(|| (directml.build(), "DirectML"))
}

#[cfg(not(feature = "directml"))]
fn directml_provider() -> Option<(ExecutionProviderDispatch, &'static str)> {
    None
}

#[cfg(feature = "coreml")]
fn coreml_provider() -> Option<(ExecutionProviderDispatch, &'static str)> {
    use ort::ep::{CoreML, ExecutionProvider};

    let coreml = CoreML::default();
    coreml
        .is_available()
        .unwrap_or(false)
        .then(|| (coreml.build(), "CoreML"))
}

#[cfg(not(feature = "coreml"))]
fn coreml_provider() -> Option<(ExecutionProviderDispatch, &'static str)> {
    None
}

/// Whether a CUDA runtime library is present on the library search path.
pub fn is_cuda_available() -> bool {
    let found = library_search_paths()
        .iter()
        .any(|dir| dir_has_match(dir, CUDA_RUNTIME_PATTERN));
    debug!("CUDA runtime libraries found: {found}");
    found
}

fn library_search_paths() -> Vec<PathBuf> {
    #[cfg(target_os = "windows")]
    let (var, separator, standard): (&str, char, &[&str]) = ("PATH", ';', &[]);
    #[cfg(target_os = "macos")]
    let (var, separator, standard): (&str, char, &[&str]) =
        ("DYLD_LIBRARY_PATH", ':', &["/usr/lib", "/usr/local/lib"]);
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let (var, separator, standard): (&str, char, &[&str]) = (
        "LD_LIBRARY_PATH",
        ':',
        &[
            "/usr/lib",
            "/usr/local/lib",
            "/usr/lib/x86_64-linux-gnu",
            "/usr/lib64",
            "/usr/local/cuda/lib64",
        ],
    );

    let mut paths: Vec<PathBuf> = std::env::var(var)
        .map(|value| {
            value
                .split(separator)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .collect()
        })
        .unwrap_or_default();
    paths.extend(standard.iter().map(PathBuf::from));
    paths
}

fn dir_has_match(dir: &Path, pattern: &str) -> bool {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return false;
    };
    entries.flatten().any(|entry| {
        entry.path().is_file()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| glob_match(name.as_bytes(), pattern.as_bytes()))
    })
}

/// `*` matches any run of bytes, `?` exactly one.
fn glob_match(name: &[u8], pattern: &[u8]) -> bool {
    match pattern.split_first() {
        None => name.is_empty(),
        Some((b'*', rest)) => (0..=name.len()).any(|i| glob_match(&name[i..], rest)),
        Some((b'?', rest)) => !name.is_empty() && glob_match(&name[1..], rest),
        Some((c, rest)) => name.first() == Some(c) && glob_match(&name[1..], rest),
    }
}
