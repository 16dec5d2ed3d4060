use std::{cell::RefCell, rc::Rc, sync::Arc};

use aria_desk_common::*;
use aria_desk_core::{
    Device, Peripherals,
    alarm::AlarmBook,
    pages::{AlarmsPage, CalendarPage, FilesPage, HomePage, MusicPage, ReaderPage},
    pagination::PrecomputeQueue,
    scheduler::{PageSet, Reachability},
};
use embassy_executor::{Executor, Spawner};
use embedded_graphics::prelude::OriginDimensions;
use static_cell::StaticCell;

mod drivers;

use drivers::*;

static PRECOMPUTE: PrecomputeQueue = PrecomputeQueue::new();
static WORKER_EXECUTOR: StaticCell<Executor> = StaticCell::new();

const DEFAULT_CARD_DIR: &str = "sdcard";
const PREFERENCES_FILE: &str = "preferences.json";

struct Args {
    card_dir: String,
    config: Option<String>,
}

fn parse_args() -> Args {
    let mut args = Args {
        card_dir: DEFAULT_CARD_DIR.to_string(),
        config: None,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => args.config = it.next(),
            "--card" => {
                if let Some(dir) = it.next() {
                    args.card_dir = dir;
                }
            }
            other => warn!("ignoring argument {:?}", other),
        }
    }
    args
}

fn load_config(path: Option<&str>) -> DeviceConfig {
    let Some(path) = path else {
        return DeviceConfig::default();
    };
    match std::fs::read(path).map_err(|e| e.to_string()).and_then(|bytes| {
        serde_json::from_slice::<DeviceConfig>(&bytes).map_err(|e| e.to_string())
    }) {
        Ok(config) => {
            info!("configuration loaded from {}", path);
            config
        }
        Err(e) => {
            warn!("cannot load {}: {}, using defaults", path, e);
            DeviceConfig::default()
        }
    }
}

#[embassy_executor::task]
async fn pagination_worker() {
    PRECOMPUTE.run().await
}

/// 分页线程：独立的执行器，只运行分页任务
fn spawn_pagination_worker() {
    let spawned = std::thread::Builder::new()
        .name("pagination".into())
        .spawn(|| {
            let executor = WORKER_EXECUTOR.init(Executor::new());
            executor.run(|spawner| {
                if let Err(e) = spawner.spawn(pagination_worker()) {
                    error!("cannot spawn pagination worker: {:?}", e);
                }
            });
        });
    if let Err(e) = spawned {
        error!("cannot start pagination thread, reader will paginate lazily: {}", e);
    }
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args();
    let config = load_config(args.config.as_deref());
    info!("aria-desk simulator, card at {}", args.card_dir);
    info!("keys: a = left, d = right, s = center, S = hold center");

    spawn_pagination_worker();

    let fs = Arc::new(HostFileSystem::new(&args.card_dir));
    let store = Rc::new(JsonFileStore::open(PREFERENCES_FILE));
    let book = Rc::new(RefCell::new(AlarmBook::load(store.clone())));
    let display = ConsolePanel::new();
    let width = display.size().width;

    let pages = PageSet::new()
        .with(HomePage::new(OfflineInfo::new()), Reachability::Cycling)
        .with(CalendarPage::new(), Reachability::Cycling)
        .with(AlarmsPage::new(book.clone()), Reachability::Cycling)
        .with(FilesPage::new(fs.clone()), Reachability::Cycling)
        .with(
            ReaderPage::new(fs, store, &config.reader, width).with_queue(&PRECOMPUTE),
            Reachability::ExplicitOnly,
        )
        .with(MusicPage::new(LoggingPlayer::new()), Reachability::ExplicitOnly);

    let device = Device::new(
        Peripherals {
            display,
            adc: KeyboardAdc::spawn(),
            tone: SimulatorBuzzer::new(),
            clock: SystemClock,
        },
        pages,
        book,
        &config,
    );
    device.run().await
}
