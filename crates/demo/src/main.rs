mod config;
mod loopback;

use std::time::{Duration, Instant};

use anyhow::{Context, Result, ensure};
use clap::Parser;
use glam::Vec3;
use tether::debug::TimingLog;
use tether::frame::{MAX_POSES, PLAYER_NAME};
use tether::net::{HEADER_BITS, MAX_PACKET_SIZE};
use tether::simulation::{DEFAULT_MAX_FRAME_TIME, DEFAULT_TICK_RATE};
use tether::{Endpoint, Input, InputFlags, ObjectId, Simulator};

use config::DemoConfig;
use loopback::{Loopback, noise};

#[derive(Parser)]
#[command(name = "tether-demo")]
#[command(about = "Headless client and server stepping one scene over a lossy in-memory link")]
struct Args {
    #[arg(short, long, default_value_t = DEFAULT_TICK_RATE)]
    ticks_per_second: u32,

    #[arg(short, long, default_value_t = 600, help = "Rendered frames to run")]
    frames: u32,

    #[arg(short, long, default_value_t = 10, help = "Cubes per side of the grid")]
    grid_width: usize,

    #[arg(long, default_value_t = 64)]
    packet_bytes: usize,

    #[arg(long, default_value_t = 0, help = "Drop every n-th client packet (0 keeps all)")]
    drop_every: u32,

    #[arg(long, default_value_t = 3, help = "Frames each packet spends in flight")]
    latency_frames: usize,

    #[arg(long, default_value_t = DEFAULT_MAX_FRAME_TIME, help = "Longest frame time in seconds")]
    max_frame_time: f64,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug)]
struct Report {
    frames: u32,
    client_ticks: u32,
    server_ticks: u32,
    tick_mean_ms: f64,
    tick_max_ms: f64,
    sent: u64,
    dropped: u64,
    acked: u64,
    unacked: usize,
    rtt_ms: f32,
    rtt_variance: f32,
    divergence: f32,
}

impl Report {
    fn log(&self) {
        log::info!(
            "ran {} frames: client {} ticks, server {} ticks",
            self.frames,
            self.client_ticks,
            self.server_ticks
        );
        log::info!(
            "client tick time over the last second: mean {:.3} ms, max {:.3} ms",
            self.tick_mean_ms,
            self.tick_max_ms
        );
        log::info!(
            "uplink: {} sent, {} dropped, {} acked, {} awaiting ack, rtt {:.1} ms (var {:.1})",
            self.sent,
            self.dropped,
            self.acked,
            self.unacked,
            self.rtt_ms,
            self.rtt_variance
        );
        log::info!("client and server players are {:.3} m apart", self.divergence);
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    ensure!(args.ticks_per_second > 0, "--ticks-per-second must be positive");
    ensure!(args.max_frame_time > 0.0, "--max-frame-time must be positive");
    ensure!(
        1 + args.grid_width * args.grid_width <= MAX_POSES,
        "a {0}x{0} grid does not fit in one frame",
        args.grid_width
    );
    let min_bytes = (HEADER_BITS + Input::wire_bits()).div_ceil(8);
    ensure!(
        (min_bytes..=MAX_PACKET_SIZE).contains(&args.packet_bytes),
        "--packet-bytes must be within {min_bytes}..={MAX_PACKET_SIZE}"
    );

    let mut config = DemoConfig {
        frames: args.frames,
        packet_bytes: args.packet_bytes,
        drop_every: args.drop_every,
        latency_frames: args.latency_frames,
        ..Default::default()
    };
    config.simulation.tick_rate = args.ticks_per_second;
    config.simulation.max_frame_time = args.max_frame_time;
    config.simulation.scene.grid_width = args.grid_width;

    let report = run(&config)?;
    report.log();
    Ok(())
}

/// Circles the player and jumps now and then.
fn steering(frame: u64) -> Input {
    let angle = frame as f32 * 0.02;
    let flags = if frame % 90 == 45 {
        InputFlags::JUMP
    } else {
        InputFlags::empty()
    };
    Input::new(Vec3::new(angle.cos(), 0.0, angle.sin()), flags)
}

fn run(config: &DemoConfig) -> Result<Report> {
    let (mut client, registry) = Simulator::from_config(&config.simulation);
    let (mut server, _) = Simulator::from_config(&config.simulation);
    log::info!(
        "following {} among {} poses",
        registry.name(ObjectId::from_name(PLAYER_NAME)),
        client.future().pose_count()
    );

    let mut client_link = Endpoint::new(config.packet_bytes);
    let mut server_link = Endpoint::new(config.packet_bytes);
    let mut uplink = Loopback::new(config.latency_frames, config.drop_every);
    let mut downlink = Loopback::new(config.latency_frames, 0);

    let mut tick_times = TimingLog::new(Duration::from_secs(1));
    let mut drawn = client.current_world_frame();
    let mut server_input = Input::default();

    let tick = client.timestep().timestep();
    let start = Instant::now();
    let mut clock = 0.0;

    for frame in 0..u64::from(config.frames) {
        let delta = tick * (1.0 + config.jitter * (2.0 * noise(frame) - 1.0));
        clock += delta;
        let now = start + Duration::from_secs_f64(clock);

        // Predict with exactly what the server will decode.
        let input = steering(frame).quantized();
        client.update_timed(delta, &input, &mut tick_times);
        client.interpolate_into(&mut drawn);

        let mut sent = input;
        let packet = client_link
            .send(&mut sent, now)
            .context("packing client input")?;
        uplink.send(frame, packet.to_bytes());

        for bytes in uplink.take_ready(frame) {
            let received = server_link
                .receive::<Input>(&bytes, Input::wire_bits(), now)
                .context("decoding client packet")?;
            if let Some(received) = received {
                server_input = received.payload;
            }
        }
        server.update(delta, &server_input);

        let mut server_tick = server.tick_count();
        let packet = server_link
            .send(&mut server_tick, now)
            .context("packing server reply")?;
        downlink.send(frame, packet.to_bytes());

        for bytes in downlink.take_ready(frame) {
            let received = client_link
                .receive::<u32>(&bytes, u32::BITS as usize, now)
                .context("decoding server packet")?;
            if let Some(received) = received {
                log::trace!("server at tick {}, acked {:?}", received.payload, received.acked);
            }
        }

        if frame % 60 == 0 {
            log::debug!(
                "frame {frame}: player at {}, eye at {} looking {}",
                drawn.poses[0].position,
                drawn.camera.position(),
                drawn.camera.view_direction()
            );
        }
    }

    let predicted = client.future().poses[0].position;
    let authoritative = server.future().poses[0].position;
    let stats = client_link.stats();
    Ok(Report {
        frames: config.frames,
        client_ticks: client.tick_count(),
        server_ticks: server.tick_count(),
        tick_mean_ms: tick_times.mean().unwrap_or_default(),
        tick_max_ms: tick_times.max().unwrap_or_default(),
        sent: stats.packets_sent,
        dropped: uplink.dropped(),
        acked: stats.packets_acked,
        unacked: client_link.unacked_count(),
        rtt_ms: stats.rtt_ms,
        rtt_variance: stats.rtt_variance,
        divergence: predicted.distance(authoritative),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick() -> DemoConfig {
        let mut config = DemoConfig {
            frames: 120,
            drop_every: 4,
            ..Default::default()
        };
        config.simulation.scene.grid_width = 2;
        config
    }

    #[test]
    fn demo_runs_both_ends_in_step() {
        let report = run(&quick()).unwrap();

        assert_eq!(report.client_ticks, report.server_ticks);
        assert!(report.client_ticks > 60);
        assert_eq!(report.sent, 120);
        assert_eq!(report.dropped, 30);
        assert!(report.acked > 0);
        assert!(report.acked <= 90);
    }

    #[test]
    fn args_parse() {
        let args = Args::try_parse_from(["tether-demo", "-t", "30", "--drop-every", "5"]).unwrap();
        assert_eq!(args.ticks_per_second, 30);
        assert_eq!(args.drop_every, 5);
        assert_eq!(args.frames, 600);
        assert!(!args.verbose);
    }
}
