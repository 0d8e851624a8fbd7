use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use std::{
    fs::File,
    io::BufReader,
    sync::Arc,
    time::Duration,
};
use ubx_pvt::{
    AcquisitionHandle, AcquisitionLoop, Device, GnssContext, IoPort, IoTransceiver, NavPvt,
    ReplayTransceiver, Snapshot, Transceiver,
};

mod cli;

fn main() -> Result<()> {
    let args = cli::Args::parse();
    env_logger::Builder::new()
        .filter_level(args.log_level())
        .parse_default_env()
        .init();

    let ctx = GnssContext::new();
    install_ctrlc_handler(Arc::clone(&ctx))?;

    let handle = match &args.replay {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open replay file: {}", path.display()))?;
            log::info!("Replaying {}", path.display());
            AcquisitionLoop::new(
                ReplayTransceiver::new(BufReader::new(file)),
                Arc::clone(&ctx),
                args.acquisition_config(),
            )
            .spawn()?
        },
        None => {
            let link = open_port(&args)?;
            let mut device = Device::new(link, args.device_config());
            if args.skip_config {
                log::info!("Skipping receiver configuration");
            } else {
                device
                    .configure(args.rate_preset(), args.io_port())
                    .context("Failed to configure receiver")?;
                report_settings(&mut device, args.io_port());
            }
            AcquisitionLoop::new(device.into_inner(), Arc::clone(&ctx), args.acquisition_config())
                .spawn()?
        },
    };

    print_fixes(&ctx, &handle, args.json)?;

    let stats = handle
        .join()
        .map_err(|_| anyhow!("Acquisition thread panicked"))?;
    log::info!(
        "{} frames, {} fixes, {} checksum errors, {} framing errors, {} size mismatches, {} transport errors",
        stats.frames,
        stats.published,
        stats.checksum_errors,
        stats.framing_errors,
        stats.size_mismatches,
        stats.transport_errors
    );
    Ok(())
}

fn install_ctrlc_handler(ctx: Arc<GnssContext>) -> Result<()> {
    ctrlc::set_handler(move || {
        log::info!("Stopping");
        ctx.request_stop();
    })
    .context("installing Ctrl-C handler failed")
}

fn open_port(args: &cli::Args) -> Result<IoTransceiver<Box<dyn serialport::SerialPort>>> {
    let port = args
        .port
        .as_deref()
        .ok_or_else(|| anyhow!("No serial port given"))?;
    let builder = serialport::new(port, args.baud)
        .data_bits(serialport::DataBits::Eight)
        .stop_bits(serialport::StopBits::One)
        .parity(serialport::Parity::None)
        .flow_control(serialport::FlowControl::None)
        .timeout(args.port_timeout());
    log::debug!("{:?}", &builder);
    let port = builder
        .open()
        .with_context(|| format!("Failed to open port: {}", port))?;
    Ok(IoTransceiver::new(port))
}

/// Reads back what the receiver is now configured to. Failures only warn.
fn report_settings<X: Transceiver>(device: &mut Device<X>, port: IoPort) {
    match device.poll_rate() {
        Ok(rate) => log::info!(
            "Measurement rate {} ms, navigation rate {}, time reference {:?}",
            rate.measure_rate_ms,
            rate.nav_rate,
            rate.time_ref
        ),
        Err(e) => log::warn!("Could not read navigation rate: {}", e),
    }
    match device.poll_msg_rate::<NavPvt>() {
        Ok(msg) if msg.is_enabled_on(port) => {
            log::info!("NAV-PVT rate on {:?}: {}", port, msg.rate_for(port))
        },
        Ok(_) => log::warn!("NAV-PVT is not enabled on {:?}, no fixes will arrive", port),
        Err(e) => log::warn!("Could not read NAV-PVT output rate: {}", e),
    }
}

fn print_fixes(ctx: &GnssContext, handle: &AcquisitionHandle, json: bool) -> Result<()> {
    let mut generation = 0;
    loop {
        let finished = ctx.is_stop_requested() || handle.is_finished();
        let timeout = if finished {
            Duration::ZERO
        } else {
            Duration::from_secs(1)
        };
        if let Some(snapshot) = ctx.wait_for_fix(generation, timeout) {
            let skipped = snapshot.generation - generation - 1;
            if skipped > 0 {
                log::debug!("Missed {} fixes", skipped);
            }
            generation = snapshot.generation;
            print_fix(&snapshot, json)?;
        } else if finished {
            return Ok(());
        }
    }
}

fn print_fix(snapshot: &Snapshot<NavPvt>, json: bool) -> Result<()> {
    let pvt = &snapshot.value;
    if json {
        println!("{}", serde_json::to_string(pvt)?);
        return Ok(());
    }
    let time = DateTime::<Utc>::try_from(pvt)
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|_| "-".to_string());
    println!(
        "{} {:?} sats={} lat={:.7} lon={:.7} alt={:.2}m hacc={:.2}m speed={:.2}m/s heading={:.1}",
        time,
        pvt.fix_type,
        pvt.num_satellites,
        pvt.latitude(),
        pvt.longitude(),
        pvt.height_msl_m(),
        pvt.horizontal_accuracy(),
        pvt.ground_speed_2d(),
        pvt.heading_motion()
    );
    Ok(())
}
