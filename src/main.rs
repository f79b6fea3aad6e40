use std::collections::HashMap;

use anyhow::{Context, Result, anyhow};
use bluer::{Adapter, AdapterEvent, Address, DeviceEvent, DeviceProperty, Uuid};
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use futures::StreamExt;
use mibeacon_lib::constants::BINDKEY_LEN;
use mibeacon_lib::{DuplicateFilter, MacAddress, MeasurementResult, Sensor, report};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Decode MiBeacon environmental-sensor advertisements seen by the local
/// BlueZ adapter. With no --device/--bindkey arguments every recognized
/// device is decoded.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Decode only these devices (display-order MAC)
    #[arg(long = "device", value_name = "MAC")]
    devices: Vec<MacAddress>,

    /// Bindkey for an encrypted device, as MAC=<32 hex digits>
    #[arg(long = "bindkey", value_name = "MAC=KEY")]
    bindkeys: Vec<String>,

    /// Also decode devices not listed with --device
    #[arg(long)]
    all: bool,

    /// Print decoded results as JSON lines
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

struct Registry {
    sensors: HashMap<MacAddress, Sensor>,
    filter: DuplicateFilter,
    accept_all: bool,
    json: bool,
}

impl Registry {
    fn from_args(args: &Args) -> Result<Self> {
        let mut sensors = HashMap::new();
        for mac in &args.devices {
            sensors.insert(*mac, Sensor::new(*mac, None));
        }
        for entry in &args.bindkeys {
            let (mac, key) = entry
                .split_once('=')
                .with_context(|| format!("--bindkey {entry:?} is not MAC=KEY"))?;
            let mac: MacAddress = mac.parse()?;
            let key: [u8; BINDKEY_LEN] = hex::decode(key)
                .ok()
                .and_then(|k| k.try_into().ok())
                .ok_or_else(|| anyhow!("bindkey for {mac} must be 32 hex digits"))?;
            sensors.insert(mac, Sensor::new(mac, Some(key)));
        }
        Ok(Self {
            accept_all: args.all || sensors.is_empty(),
            sensors,
            filter: DuplicateFilter::new(),
            json: args.json,
        })
    }

    fn handle(&mut self, address: Address, service_data: &mut HashMap<Uuid, Vec<u8>>) {
        let mac = MacAddress(address.0);
        if !self.sensors.contains_key(&mac) {
            if !self.accept_all {
                return;
            }
            self.sensors.insert(mac, Sensor::new(mac, None));
        }

        let sensor = &self.sensors[&mac];
        if let Some(result) = sensor.handle_advertisement(&mut self.filter, service_data) {
            self.publish(&result);
        }
    }

    fn publish(&self, result: &MeasurementResult) {
        if self.json {
            match serde_json::to_string(result) {
                Ok(line) => println!("{line}"),
                Err(err) => warn!(%err, "serializing result failed"),
            }
        } else {
            report::report(result);
        }
    }
}

async fn watch_device(
    adapter: Adapter,
    address: Address,
    tx: mpsc::UnboundedSender<(Address, HashMap<Uuid, Vec<u8>>)>,
) -> bluer::Result<()> {
    let device = adapter.device(address)?;

    // service data cached by BlueZ at discovery time, then every update
    if let Some(service_data) = device.service_data().await? {
        let _ = tx.send((address, service_data));
    }
    let mut events = device.events().await?;
    while let Some(DeviceEvent::PropertyChanged(property)) = events.next().await {
        if let DeviceProperty::ServiceData(service_data) = property {
            let _ = tx.send((address, service_data));
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    // INFO by default, DEBUG with -v, TRACE with -vv; RUST_LOG overrides
    let filter = EnvFilter::builder()
        .with_default_directive(args.verbosity.tracing_level_filter().into())
        .from_env_lossy();
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut registry = Registry::from_args(&args)?;

    let session = bluer::Session::new().await?;
    let adapter = session.default_adapter().await?;
    adapter.set_powered(true).await?;
    info!("Scanning for advertisements on {}", adapter.name());

    let (tx, mut rx) = mpsc::unbounded_channel();

    let mut discovery = adapter.discover_devices().await?;
    let watcher_adapter = adapter.clone();
    tokio::spawn(async move {
        while let Some(event) = discovery.next().await {
            if let AdapterEvent::DeviceAdded(address) = event {
                let adapter = watcher_adapter.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    if let Err(err) = watch_device(adapter, address, tx).await {
                        debug!(%address, %err, "device watcher ended");
                    }
                });
            }
        }
    });

    while let Some((address, mut service_data)) = rx.recv().await {
        registry.handle(address, &mut service_data);
    }
    Ok(())
}
