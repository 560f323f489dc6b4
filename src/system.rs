use std::process::Command;

use sysinfo::System;

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// What this machine can offer a locally hosted model.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemSpecs {
    pub total_ram_gb: f64,
    pub available_ram_gb: f64,
    pub cpu_name: String,
    pub cpu_cores: usize,
    /// Dedicated VRAM, or the shared pool on unified-memory machines.
    pub gpu_vram_gb: Option<f64>,
    pub unified_memory: bool,
}

impl SystemSpecs {
    pub fn detect() -> Self {
        let mut sys = System::new_all();
        sys.refresh_memory();

        let total_ram_gb = sys.total_memory() as f64 / GIB;
        let available_ram_gb = sys.available_memory() as f64 / GIB;
        let cpu_name = sys
            .cpus()
            .first()
            .map(|cpu| cpu.brand().trim().to_string())
            .unwrap_or_else(|| "Unknown CPU".to_string());

        let (gpu_vram_gb, unified_memory) = match nvidia_vram_gb() {
            Some(vram) => (Some(vram), false),
            None if is_apple_silicon() => (Some(available_ram_gb), true),
            None => (None, false),
        };

        tracing::debug!(total_ram_gb, available_ram_gb, ?gpu_vram_gb, "detected system");

        SystemSpecs {
            total_ram_gb,
            available_ram_gb,
            cpu_name,
            cpu_cores: sys.cpus().len(),
            gpu_vram_gb,
            unified_memory,
        }
    }

    pub fn summary(&self) -> String {
        let gpu = match (self.gpu_vram_gb, self.unified_memory) {
            (Some(v), true) => format!("unified memory, {:.1} GB shared", v),
            (Some(v), false) => format!("{:.1} GB VRAM", v),
            (None, _) => "none detected".to_string(),
        };
        format!(
            "CPU: {} ({} cores) | RAM: {:.1} / {:.1} GB available | GPU: {}",
            self.cpu_name, self.cpu_cores, self.available_ram_gb, self.total_ram_gb, gpu
        )
    }
}

/// Largest VRAM reported by `nvidia-smi`, in GB.
fn nvidia_vram_gb() -> Option<f64> {
    let output = Command::new("nvidia-smi")
        .args(["--query-gpu=memory.total", "--format=csv,noheader,nounits"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    parse_nvidia_smi(&text)
}

fn parse_nvidia_smi(text: &str) -> Option<f64> {
    text.lines()
        .filter_map(|line| line.trim().parse::<f64>().ok())
        .map(|mib| mib / 1024.0)
        .reduce(f64::max)
}

fn is_apple_silicon() -> bool {
    cfg!(all(target_os = "macos", target_arch = "aarch64"))
}
