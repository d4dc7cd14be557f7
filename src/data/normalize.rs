//! Raw payload to view model.
//!
//! [`normalize`] is total: every payload that is a JSON object yields a
//! fully populated [`ViewModel`]. Missing or malformed fields resolve to
//! their defaults and never surface as errors.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use rigwatch_types::{
    AssetInventory, GpuDevice, HostInfo, ResourceUsage, ServiceState, ServiceStatus, Services,
    StorageVolume, ViewModel,
};

use super::payload::{
    field, first_present, flag, name_list, number, number_or_zero, records, text, text_or_unknown,
    RawPayload,
};
use super::sensors::{thermal_power, AMBIENT_SENSOR_NAME};
use super::units::{vram_to_gib, VRAM_BYTE_THRESHOLD};

/// Tunable constants of the normalizer.
#[derive(Debug, Clone, PartialEq)]
pub struct Heuristics {
    /// VRAM values above this are read as bytes, the rest as MiB.
    pub vram_byte_threshold: f64,
    /// Exact name of the ambient inlet temperature sensor.
    pub ambient_sensor_name: String,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            vram_byte_threshold: VRAM_BYTE_THRESHOLD,
            ambient_sensor_name: AMBIENT_SENSOR_NAME.to_string(),
        }
    }
}

/// Convert a raw payload into the view model.
pub fn normalize(payload: &RawPayload, heuristics: &Heuristics) -> ViewModel {
    ViewModel {
        host: host_info(payload),
        usage: resource_usage(payload),
        thermal: thermal_power(payload, &heuristics.ambient_sensor_name),
        gpus: gpu_devices(payload, heuristics),
        services: services(payload),
        assets: asset_inventory(payload),
        workflows: workflows(payload),
        storage: storage_volumes(payload),
        paths: paths(payload),
    }
}

fn host_info(payload: &RawPayload) -> HostInfo {
    let system = payload.get("system");
    let versions = payload.get("versions");
    let pick = |primary: &str, fallback: Option<&Value>| {
        text_or_unknown(first_present([field(system, primary), fallback]))
    };

    HostInfo {
        hostname: pick("hostname", payload.get("hostname")),
        os_name: pick("os_name", field(system, "os")),
        os_version: pick("os_version", field(system, "os_release")),
        kernel: pick("kernel", field(system, "kernel_version")),
        architecture: pick("arch", field(system, "architecture")),
        cpu_model: pick("cpu_model", payload.at(&["cpu", "model"])),
        python_version: pick("python_version", field(versions, "python")),
        pytorch_version: pick("torch_version", field(versions, "torch")),
        cuda_version: pick("cuda_version", field(versions, "cuda")),
        driver_version: pick("driver_version", field(versions, "driver")),
    }
}

fn resource_usage(payload: &RawPayload) -> ResourceUsage {
    let memory = first_present([payload.get("memory"), payload.get("ram")]);

    ResourceUsage {
        cpu_percent: number_or_zero(first_present([
            payload.at(&["cpu", "percent"]),
            payload.get("cpu_percent"),
        ])),
        ram_used_gb: number_or_zero(first_present([
            field(memory, "used_gb"),
            field(memory, "used"),
        ])),
        ram_total_gb: number_or_zero(first_present([
            field(memory, "total_gb"),
            field(memory, "total"),
        ])),
        uptime_seconds: number_or_zero(first_present([
            payload.get("uptime_seconds"),
            payload.at(&["system", "uptime"]),
        ])),
    }
}

fn gpu_devices(payload: &RawPayload, heuristics: &Heuristics) -> Vec<GpuDevice> {
    let entries = first_present([payload.get("gpus"), payload.get("gpu")]);

    records(entries)
        .into_iter()
        .enumerate()
        .map(|(position, gpu)| gpu_device(position, gpu, heuristics))
        .collect()
}

fn gpu_device(position: usize, gpu: &Map<String, Value>, heuristics: &Heuristics) -> GpuDevice {
    let vram = |primary: &str, legacy: &str| {
        let raw = number_or_zero(first_present([gpu.get(primary), gpu.get(legacy)]));
        vram_to_gib(raw, heuristics.vram_byte_threshold)
    };

    GpuDevice {
        index: number(gpu.get("index"))
            .map(|i| i as u32)
            .unwrap_or(position as u32),
        name: text_or_unknown(first_present([gpu.get("name"), gpu.get("model")])),
        memory_total_gib: vram("memory_total", "vram_total"),
        memory_used_gib: vram("memory_used", "vram_used"),
        utilization_percent: number_or_zero(first_present([
            gpu.get("utilization"),
            gpu.get("util"),
        ])),
        temperature_celsius: number_or_zero(first_present([
            gpu.get("temperature"),
            gpu.get("temp"),
        ])),
        fan_percent: number(gpu.get("fan_speed")),
        compute_only: flag(gpu.get("is_compute")),
    }
}

fn services(payload: &RawPayload) -> Services {
    let service = |name: &str| {
        let entry = first_present([payload.at(&["services", name]), payload.get(name)]);
        service_status(entry)
    };

    Services {
        image_generation: service("comfyui"),
        llm: service("ollama"),
    }
}

/// Read one service entry. The status moved from `state` to `status`
/// between backend versions; both are accepted.
pub fn service_status(entry: Option<&Value>) -> ServiceStatus {
    let state = first_present([field(entry, "status"), field(entry, "state")])
        .map(parse_state)
        .unwrap_or(ServiceState::Unknown);

    ServiceStatus {
        state,
        version: text_or_unknown(field(entry, "version")),
        artifacts: name_list(first_present([field(entry, "models"), field(entry, "artifacts")])),
    }
}

fn parse_state(value: &Value) -> ServiceState {
    if let Some(running) = value.as_bool() {
        return if running {
            ServiceState::Running
        } else {
            ServiceState::Stopped
        };
    }

    let Some(label) = value.as_str() else {
        return ServiceState::Unknown;
    };
    match label.trim().to_ascii_lowercase().as_str() {
        "running" | "online" | "active" | "up" | "ok" => ServiceState::Running,
        "stopped" | "offline" | "inactive" | "down" | "exited" | "error" => ServiceState::Stopped,
        _ => ServiceState::Unknown,
    }
}

fn asset_inventory(payload: &RawPayload) -> AssetInventory {
    let assets = payload.get("assets");
    AssetInventory {
        checkpoints: name_list(field(assets, "checkpoints")),
        loras: name_list(field(assets, "loras")),
        vae: name_list(field(assets, "vae")),
        embeddings: name_list(field(assets, "embeddings")),
        custom_nodes: name_list(field(assets, "custom_nodes")),
    }
}

fn workflows(payload: &RawPayload) -> Vec<String> {
    name_list(first_present([
        payload.get("workflows"),
        payload.at(&["assets", "workflows"]),
    ]))
}

fn storage_volumes(payload: &RawPayload) -> Vec<StorageVolume> {
    let volumes = first_present([payload.get("storage"), payload.get("disks")]);
    records(volumes).into_iter().map(storage_volume).collect()
}

fn storage_volume(volume: &Map<String, Value>) -> StorageVolume {
    let total_gb = number_or_zero(volume.get("total_gb"));
    let used_gb = number_or_zero(volume.get("used_gb"));
    // Older backends omit free space; derive it when the other two are known
    let free_gb = number(volume.get("free_gb")).unwrap_or_else(|| (total_gb - used_gb).max(0.0));

    StorageVolume {
        path: text_or_unknown(first_present([volume.get("path"), volume.get("mount")])),
        total_gb,
        used_gb,
        free_gb,
        filesystem: text_or_unknown(first_present([volume.get("fstype"), volume.get("filesystem")])),
        description: text(volume.get("description")).unwrap_or_default(),
    }
}

fn paths(payload: &RawPayload) -> BTreeMap<String, String> {
    let Some(Value::Object(map)) = payload.get("paths") else {
        return BTreeMap::new();
    };
    map.iter()
        .filter_map(|(name, value)| Some((name.clone(), text(Some(value))?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> RawPayload {
        RawPayload::from_value(value).unwrap()
    }

    fn normalize_default(value: Value) -> ViewModel {
        normalize(&payload(value), &Heuristics::default())
    }

    #[test]
    fn test_empty_payload_is_fully_defaulted() {
        let view = normalize_default(json!({}));

        assert_eq!(view, ViewModel::default());
        assert_eq!(view.host.hostname, "unknown");
        assert_eq!(view.usage.cpu_percent, 0.0);
        assert_eq!(view.thermal.ambient_celsius, None);
        assert!(view.gpus.is_empty());
        assert!(view.storage.is_empty());
        assert!(view.workflows.is_empty());
        assert!(view.paths.is_empty());
        assert_eq!(view.services.llm.state, ServiceState::Unknown);
    }

    #[test]
    fn test_gpu_memory_in_bytes_and_mebibytes() {
        let view = normalize_default(json!({
            "gpus": [
                {"index": 0, "name": "RTX 4080", "memory_total": 17179869184u64, "memory_used": 4294967296u64},
                {"index": 1, "name": "RTX A4000", "memory_total": 16384, "memory_used": 2048}
            ]
        }));

        assert_eq!(view.gpus[0].memory_total_gib, 16.0);
        assert_eq!(view.gpus[0].memory_used_gib, 4.0);
        assert_eq!(view.gpus[1].memory_total_gib, 16.0);
        assert_eq!(view.gpus[1].memory_used_gib, 2.0);
    }

    #[test]
    fn test_gpu_legacy_fields() {
        let view = normalize_default(json!({
            "gpu": {"model": "Tesla P40", "vram_total": "24576", "util": "87", "temp": 71, "is_compute": true}
        }));

        let gpu = &view.gpus[0];
        assert_eq!(gpu.index, 0);
        assert_eq!(gpu.name, "Tesla P40");
        assert_eq!(gpu.memory_total_gib, 24.0);
        assert_eq!(gpu.memory_used_gib, 0.0);
        assert_eq!(gpu.utilization_percent, 87.0);
        assert_eq!(gpu.temperature_celsius, 71.0);
        assert_eq!(gpu.fan_percent, None);
        assert_eq!(gpu.compute_only, Some(true));
    }

    #[test]
    fn test_gpu_index_defaults_to_position() {
        let view = normalize_default(json!({"gpus": [{"name": "a"}, {"name": "b"}]}));
        assert_eq!(view.gpus[0].index, 0);
        assert_eq!(view.gpus[1].index, 1);
        assert_eq!(view.gpus[1].compute_only, None);
    }

    #[test]
    fn test_service_status_primary_key() {
        let status = service_status(Some(&json!({"status": "running", "state": "stopped"})));
        assert_eq!(status.state, ServiceState::Running);
    }

    #[test]
    fn test_service_status_legacy_key() {
        let status = service_status(Some(&json!({"state": "stopped", "version": "0.1.32"})));
        assert_eq!(status.state, ServiceState::Stopped);
        assert_eq!(status.version, "0.1.32");
    }

    #[test]
    fn test_service_status_unknown() {
        assert_eq!(service_status(Some(&json!({}))).state, ServiceState::Unknown);
        assert_eq!(service_status(None).state, ServiceState::Unknown);
        assert_eq!(
            service_status(Some(&json!({"status": "rebooting"}))).state,
            ServiceState::Unknown
        );
        assert_eq!(
            service_status(Some(&json!({"status": false}))).state,
            ServiceState::Stopped
        );
    }

    #[test]
    fn test_services_root_level_variant() {
        let view = normalize_default(json!({
            "ollama": {"status": "Running", "version": "0.3.12", "models": [{"name": "llama3:8b"}, {"name": "qwen2:7b"}]},
            "services": {"comfyui": {"state": "online"}}
        }));

        assert_eq!(view.services.llm.state, ServiceState::Running);
        assert_eq!(view.services.llm.artifacts, vec!["llama3:8b", "qwen2:7b"]);
        assert_eq!(view.services.image_generation.state, ServiceState::Running);
        assert_eq!(view.services.image_generation.version, "unknown");
    }

    #[test]
    fn test_string_numerics() {
        let view = normalize_default(json!({
            "cpu_percent": "12.5",
            "memory": {"used_gb": "31.4", "total_gb": "64"},
            "uptime_seconds": "not a number"
        }));

        assert_eq!(view.usage.cpu_percent, 12.5);
        assert_eq!(view.usage.ram_used_gb, 31.4);
        assert_eq!(view.usage.ram_total_gb, 64.0);
        assert_eq!(view.usage.uptime_seconds, 0.0);
    }

    #[test]
    fn test_host_info_fallbacks() {
        let view = normalize_default(json!({
            "hostname": "rig-01",
            "system": {"os": "Ubuntu", "os_release": "22.04", "kernel_version": "6.5.0", "architecture": "x86_64"},
            "cpu": {"model": "Threadripper 7970X", "percent": 9},
            "versions": {"python": "3.11.9", "torch": "2.3.1", "cuda": 12.4}
        }));

        assert_eq!(view.host.hostname, "rig-01");
        assert_eq!(view.host.os_label(), "Ubuntu 22.04");
        assert_eq!(view.host.kernel, "6.5.0");
        assert_eq!(view.host.architecture, "x86_64");
        assert_eq!(view.host.cpu_model, "Threadripper 7970X");
        assert_eq!(view.host.pytorch_version, "2.3.1");
        assert_eq!(view.host.cuda_version, "12.4");
        assert_eq!(view.host.driver_version, "unknown");
        assert_eq!(view.usage.cpu_percent, 9.0);
    }

    #[test]
    fn test_storage_volumes() {
        let view = normalize_default(json!({
            "storage": [
                {"path": "/", "total_gb": 500, "used_gb": 120, "free_gb": 380, "fstype": "ext4", "description": "System"},
                {"path": "/mnt/models", "total_gb": "2000", "used_gb": "1500"},
                "garbage"
            ]
        }));

        assert_eq!(view.storage.len(), 2);
        assert_eq!(view.storage[0].filesystem, "ext4");
        assert_eq!(view.storage[0].description, "System");
        assert_eq!(view.storage[1].free_gb, 500.0);
        assert_eq!(view.storage[1].filesystem, "unknown");
        assert_eq!(view.storage[1].description, "");
    }

    #[test]
    fn test_assets_workflows_and_paths() {
        let view = normalize_default(json!({
            "assets": {
                "checkpoints": ["sdxl_base.safetensors"],
                "loras": null,
                "custom_nodes": [{"name": "ComfyUI-Manager"}],
                "workflows": ["nested.json"]
            },
            "paths": {"models": "/opt/comfy/models", "output": "/opt/comfy/output", "bogus": [1]}
        }));

        assert_eq!(view.assets.checkpoints, vec!["sdxl_base.safetensors"]);
        assert!(view.assets.loras.is_empty());
        assert_eq!(view.assets.custom_nodes, vec!["ComfyUI-Manager"]);
        assert_eq!(view.workflows, vec!["nested.json"]);
        assert_eq!(view.paths.len(), 2);
        assert_eq!(view.paths["models"], "/opt/comfy/models");
    }

    #[test]
    fn test_top_level_workflows_win() {
        let view = normalize_default(json!({
            "workflows": ["top.json"],
            "assets": {"workflows": ["nested.json"]}
        }));
        assert_eq!(view.workflows, vec!["top.json"]);
    }

    #[test]
    fn test_custom_heuristics() {
        let heuristics = Heuristics {
            vram_byte_threshold: 10_000.0,
            ambient_sensor_name: "Ambient".to_string(),
        };
        let view = normalize(
            &payload(json!({
                "gpus": [{"memory_total": 1073741824}],
                "thermal": {"Temperatures": [{"Name": "Ambient", "Reading": 19}]}
            })),
            &heuristics,
        );

        assert_eq!(view.gpus[0].memory_total_gib, 1.0);
        assert_eq!(view.thermal.ambient_celsius, Some(19.0));
    }

    #[test]
    fn test_wrong_types_never_escape() {
        let view = normalize_default(json!({
            "system": "not an object",
            "cpu": [1, 2, 3],
            "memory": {"used_gb": {"nested": true}, "total_gb": -8},
            "gpus": "none",
            "storage": {"path": "/"},
            "services": [],
            "assets": "none",
            "paths": "none",
            "thermal": {"Temperatures": {}, "Fans": "fast"},
            "power": 12
        }));

        assert_eq!(view.host, HostInfo::default());
        assert_eq!(view.usage, ResourceUsage::default());
        assert!(view.gpus.is_empty());
        assert_eq!(view.storage.len(), 1);
        assert_eq!(view.storage[0].path, "/");
        assert_eq!(view.thermal.power_watts, 0.0);
        assert_eq!(view.thermal.fan_percent, 0.0);
        assert_eq!(view.thermal.ambient_celsius, None);
    }
}
