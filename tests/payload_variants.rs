//! Whole-payload tests across the backend versions seen in the field,
//! plus an end-to-end poll over a payload file.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tempfile::NamedTempFile;

use rigwatch::{
    normalize, FetchOutcome, FileFetcher, Heuristics, MonitorTarget, Phase, PollController,
    RawPayload, TelemetryFetcher,
};
use rigwatch_types::{ServiceState, ViewModel};

fn view_of(value: Value) -> ViewModel {
    let payload = RawPayload::from_value(value).expect("payload must be an object");
    normalize(&payload, &Heuristics::default())
}

fn current_backend() -> Value {
    json!({
        "system": {
            "hostname": "render-box",
            "os_name": "Ubuntu",
            "os_version": "22.04",
            "kernel": "6.5.0-35-generic",
            "arch": "x86_64",
            "cpu_model": "AMD Ryzen 9 7950X",
            "python_version": "3.11.9",
            "torch_version": "2.3.1+cu121",
            "cuda_version": "12.1",
            "driver_version": "550.78"
        },
        "cpu": { "percent": 37.5 },
        "memory": { "used_gb": 48.2, "total_gb": 128.0 },
        "uptime_seconds": 93784,
        "thermal": {
            "Temperatures": [
                { "Name": "CPU1 Temp", "ReadingCelsius": 61 },
                { "Name": "System Board Inlet Temp", "ReadingCelsius": 24 }
            ],
            "Fans": [{ "Reading": 30 }, { "Reading": 50 }]
        },
        "power": { "PowerControl": [{ "PowerConsumedWatts": 612 }] },
        "gpus": [
            {
                "index": 0,
                "name": "NVIDIA GeForce RTX 4090",
                "memory_total": 25757220864u64,
                "memory_used": 2147483648u64,
                "utilization": 88,
                "temperature": 71,
                "fan_speed": 45,
                "is_compute": false
            },
            {
                "index": 1,
                "name": "NVIDIA RTX A6000",
                "memory_total": 51527024640u64,
                "memory_used": 0,
                "utilization": 0,
                "temperature": 38,
                "is_compute": true
            }
        ],
        "services": {
            "comfyui": {
                "status": "running",
                "version": "0.2.2",
                "models": ["sd_xl_base_1.0.safetensors"]
            },
            "ollama": {
                "status": "stopped",
                "models": [{ "name": "llama3:8b" }, { "name": "mistral:7b" }]
            }
        },
        "assets": {
            "checkpoints": ["sd_xl_base_1.0.safetensors", "flux1-dev.safetensors"],
            "loras": [],
            "vae": ["sdxl_vae.safetensors"],
            "embeddings": [],
            "custom_nodes": ["ComfyUI-Manager"]
        },
        "workflows": ["txt2img.json", "upscale.json"],
        "storage": [
            { "path": "/", "total_gb": 1000, "used_gb": 420, "free_gb": 580, "fstype": "ext4" },
            { "path": "/models", "total_gb": 4000, "used_gb": 3100, "fstype": "xfs", "description": "Model store" }
        ],
        "paths": { "models": "/models", "output": "/srv/comfy/output" }
    })
}

fn legacy_backend() -> Value {
    json!({
        "hostname": "old-rig",
        "cpu_percent": "12.5",
        "ram": { "used": "7.5", "total": "32" },
        "system": { "uptime": 3600, "os": "Debian", "os_release": "12" },
        "gpu": {
            "name": "RTX 3090",
            "vram_total": 24576,
            "vram_used": "6144",
            "util": "55",
            "temp": 66
        },
        "comfyui": { "state": "running", "artifacts": ["v1-5-pruned.ckpt"] },
        "ollama": { "state": "offline" },
        "disks": [{ "mount": "/data", "total_gb": 500, "used_gb": 125 }],
        "thermal": {
            "Temperatures": [{ "Name": "System Board Inlet Temp", "Reading": 22.5 }],
            "Fans": [{ "Reading": "n/a" }]
        },
        "power": { "consumed_watts": 350 }
    })
}

#[test]
fn test_current_backend_payload() {
    let view = view_of(current_backend());

    assert_eq!(view.host.hostname, "render-box");
    assert_eq!(view.host.os_label(), "Ubuntu 22.04");
    assert_eq!(view.host.pytorch_version, "2.3.1+cu121");
    assert_eq!(view.usage.cpu_percent, 37.5);
    assert_eq!(view.usage.ram_total_gb, 128.0);

    assert_eq!(view.thermal.ambient_celsius, Some(24.0));
    assert_eq!(view.thermal.fan_percent, 40.0);
    assert_eq!(view.thermal.power_watts, 612.0);

    assert_eq!(view.gpus.len(), 2);
    assert_eq!(view.gpus[0].memory_total_gib, 23.98828125);
    assert_eq!(view.gpus[0].memory_used_gib, 2.0);
    assert_eq!(view.gpus[0].fan_percent, Some(45.0));
    assert_eq!(view.gpus[1].memory_total_gib, 47.98828125);
    assert_eq!(view.gpus[1].fan_percent, None);
    assert_eq!(view.gpus[1].compute_only, Some(true));

    assert_eq!(view.services.image_generation.state, ServiceState::Running);
    assert_eq!(view.services.image_generation.version, "0.2.2");
    assert_eq!(view.services.llm.state, ServiceState::Stopped);
    assert_eq!(view.services.llm.artifacts, vec!["llama3:8b", "mistral:7b"]);

    assert_eq!(view.assets.checkpoints.len(), 2);
    assert_eq!(view.assets.custom_nodes, vec!["ComfyUI-Manager"]);
    assert_eq!(view.workflows.len(), 2);

    assert_eq!(view.storage.len(), 2);
    assert_eq!(view.storage[1].free_gb, 900.0);
    assert_eq!(view.storage[1].description, "Model store");
    assert_eq!(view.paths.get("output").map(String::as_str), Some("/srv/comfy/output"));
}

#[test]
fn test_legacy_backend_payload() {
    let view = view_of(legacy_backend());

    assert_eq!(view.host.hostname, "old-rig");
    assert_eq!(view.host.os_label(), "Debian 12");
    assert_eq!(view.host.kernel, "unknown");
    assert_eq!(view.usage.cpu_percent, 12.5);
    assert_eq!(view.usage.ram_used_gb, 7.5);
    assert_eq!(view.usage.uptime_seconds, 3600.0);

    assert_eq!(view.thermal.ambient_celsius, Some(22.5));
    assert_eq!(view.thermal.fan_percent, 0.0);
    assert_eq!(view.thermal.power_watts, 350.0);

    assert_eq!(view.gpus.len(), 1);
    let gpu = &view.gpus[0];
    assert_eq!(gpu.index, 0);
    assert_eq!(gpu.memory_total_gib, 24.0);
    assert_eq!(gpu.memory_used_gib, 6.0);
    assert_eq!(gpu.utilization_percent, 55.0);
    assert_eq!(gpu.compute_only, None);

    assert_eq!(view.services.image_generation.state, ServiceState::Running);
    assert_eq!(view.services.image_generation.artifacts, vec!["v1-5-pruned.ckpt"]);
    assert_eq!(view.services.llm.state, ServiceState::Stopped);
    assert_eq!(view.services.llm.version, "unknown");

    assert_eq!(view.storage[0].path, "/data");
    assert_eq!(view.storage[0].free_gb, 375.0);
    assert!(view.assets.is_empty());
}

#[test]
fn test_minimal_payloads_stay_renderable() {
    assert_eq!(view_of(json!({})), ViewModel::default());

    let view = view_of(json!({
        "gpus": null,
        "services": "down",
        "storage": 42,
        "thermal": { "Temperatures": "none", "Fans": [null, {}] },
        "cpu": { "percent": "NaN" },
        "memory": { "used_gb": -3 }
    }));
    assert!(view.gpus.is_empty());
    assert!(view.storage.is_empty());
    assert_eq!(view.services.llm.state, ServiceState::Unknown);
    assert_eq!(view.thermal.ambient_celsius, None);
    assert_eq!(view.thermal.fan_percent, 0.0);
    assert_eq!(view.usage.cpu_percent, 0.0);
    assert_eq!(view.usage.ram_used_gb, 0.0);
}

#[test]
fn test_custom_heuristics() {
    let payload = RawPayload::from_value(json!({
        "gpus": [{ "memory_total": 2048 }],
        "thermal": { "Temperatures": [{ "Name": "Inlet", "ReadingCelsius": 19 }] }
    }))
    .unwrap();

    let heuristics = Heuristics {
        vram_byte_threshold: 1000.0,
        ambient_sensor_name: "Inlet".to_string(),
    };
    let view = normalize(&payload, &heuristics);
    assert_eq!(view.gpus[0].memory_total_gib, 2048.0 / (1024.0 * 1024.0 * 1024.0));
    assert_eq!(view.thermal.ambient_celsius, Some(19.0));

    let defaults = normalize(&payload, &Heuristics::default());
    assert_eq!(defaults.gpus[0].memory_total_gib, 2.0);
    assert_eq!(defaults.thermal.ambient_celsius, None);
}

fn write_payload(file: &mut NamedTempFile, body: &str) {
    let handle = file.as_file_mut();
    handle.set_len(0).unwrap();
    std::io::Seek::rewind(handle).unwrap();
    handle.write_all(body.as_bytes()).unwrap();
    handle.flush().unwrap();
}

#[tokio::test]
async fn test_file_fetcher_reads_payload() {
    let mut file = NamedTempFile::new().unwrap();
    write_payload(&mut file, &current_backend().to_string());

    let fetcher = FileFetcher::new(file.path());
    match fetcher.fetch(&MonitorTarget::new("", None)).await {
        FetchOutcome::Success(payload) => {
            let view = normalize(&payload, &Heuristics::default());
            assert_eq!(view.host.hostname, "render-box");
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn test_polling_file_keeps_last_good_view() {
    let mut file = NamedTempFile::new().unwrap();
    write_payload(&mut file, &current_backend().to_string());

    let fetcher: Arc<dyn TelemetryFetcher> = Arc::new(FileFetcher::new(file.path()));
    let controller = PollController::new(fetcher, Heuristics::default())
        .with_period(Duration::from_millis(50));
    let mut updates = controller.subscribe();

    controller.reconfigure(MonitorTarget::new("", None));
    tokio::time::timeout(
        Duration::from_secs(5),
        updates.wait_for(|d| d.phase == Phase::Updated),
    )
    .await
    .expect("first update")
    .unwrap();

    write_payload(&mut file, "[1, 2, 3]");
    let dashboard = tokio::time::timeout(
        Duration::from_secs(5),
        updates.wait_for(|d| {
            d.error
                .as_deref()
                .is_some_and(|e| e.contains("expected a JSON object"))
        }),
    )
    .await
    .expect("error after bad payload")
    .unwrap()
    .clone();

    assert!(dashboard.is_stale());
    assert_eq!(dashboard.phase, Phase::Errored);
    assert_eq!(
        dashboard.view.as_ref().map(|v| v.host.hostname.as_str()),
        Some("render-box")
    );

    controller.teardown();
    assert_eq!(controller.snapshot().phase, Phase::TornDown);
}
