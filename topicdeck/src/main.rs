use clap::{Parser, Subcommand};
use msgschema::{MessageValue, SchemaRegistry};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use topicbus::MessageBus;
use topicdeck_core::bag::DEFAULT_PLAYER_PROGRAM;
use topicdeck_core::{BagInfo, BagPlayer};
use topicdeck_gui::{run_gui, GuiConfig};

mod demo;

#[derive(Parser)]
#[command(name = "topicdeck", version, about = "Message publishing and plotting deck")]
struct Cli {
    /// Spawn demo talkers so panels have live topics to work with
    #[arg(long)]
    demo: bool,
    /// Directory of *.toml message definitions loaded on top of the builtins
    #[arg(long)]
    schemas: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered message types and their fields
    Types,
    /// Print a bag summary without opening the GUI
    BagInfo {
        path: String,
        /// Player binary to query
        #[arg(long, default_value = DEFAULT_PLAYER_PROGRAM)]
        program: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let cli = Cli::parse();

    let mut registry = SchemaRegistry::with_builtins();
    if let Some(dir) = &cli.schemas {
        load_schema_dir(&mut registry, dir)?;
    }
    let registry = Arc::new(registry);

    match cli.command {
        Some(Commands::Types) => {
            for name in registry.names() {
                println!("{name}");
                if let Some(schema) = registry.get(name) {
                    for field in &schema.fields {
                        println!("    {}: {}", field.name, field.ty.tag());
                    }
                }
            }
        }
        Some(Commands::BagInfo { path, program }) => {
            let player = BagPlayer::with_program(&program, &path);
            let info = player.info()?;
            print_bag_info(&info);
        }
        None => {
            let bus: MessageBus<MessageValue> = MessageBus::new();
            let talkers = if cli.demo {
                demo::spawn_demo_talkers(&bus, &registry)?
            } else {
                Vec::new()
            };
            run_gui(GuiConfig::default(), bus, Arc::clone(&registry))?;
            for talker in talkers {
                talker.stop();
            }
        }
    }
    Ok(())
}

fn load_schema_dir(
    registry: &mut SchemaRegistry,
    dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().map(|ext| ext == "toml").unwrap_or(false))
        .collect();
    // Registration order is visible when files reference each other's types.
    files.sort();
    for path in files {
        registry.load_toml_file(&path)?;
    }
    Ok(())
}

fn print_bag_info(info: &BagInfo) {
    if let Some(path) = &info.path {
        println!("path:     {path}");
    }
    if let Some(duration) = info.duration {
        println!("duration: {duration:.1} s");
    }
    if let Some(messages) = info.messages {
        println!("messages: {messages}");
    }
    if let Some(size) = info.size {
        println!("size:     {size} bytes");
    }
    for topic in &info.topics {
        let mut line = format!("{}  [{}]", topic.topic, topic.type_name);
        if let Some(messages) = topic.messages {
            line.push_str(&format!("  {messages} msgs"));
        }
        if let Some(frequency) = topic.frequency {
            line.push_str(&format!("  @ {frequency:.1} Hz"));
        }
        println!("{line}");
    }
}
