use log::debug;
use roommap::{speedwalk, RoomGraph, RoomId};
use std::env;

fn usage(program: &str) {
    println!("roommap - inspect a saved room map");
    println!();
    println!("Usage: {} <map-file> <command> [args]", program);
    println!("Commands:");
    println!("  summary              room and exit counts");
    println!("  room <id>            name, coordinates, data and exits of one room");
    println!("  find <text>          rooms whose name contains <text>");
    println!("  path <from> <to>     walking directions between two rooms");
    println!();
    println!("Room ids that parse as integers are treated as integers.");
}

/// Name to show in the usage text; the OS may pass no arguments at all.
fn program_name(args: &[String]) -> &str {
    args.first().map(String::as_str).unwrap_or("roommap")
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let program = program_name(&args);
    if args.len() < 3 {
        usage(program);
        return Ok(());
    }

    let map_path = &args[1];
    debug!("Loading room map: {}", map_path);
    let serialized = match std::fs::read_to_string(map_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: cannot read map file '{}': {}", map_path, e);
            std::process::exit(1);
        }
    };
    let map: RoomGraph = match RoomGraph::from_serialized(&serialized) {
        Ok(map) => map,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    match (args[2].as_str(), &args[3..]) {
        ("summary", _) => {
            println!("{}", map);
        }
        ("room", [id]) => {
            let id = RoomId::parse(id);
            if !map.contains_room(&id) {
                eprintln!("Error: room {} is not on the map", id);
                std::process::exit(1);
            }
            let (x, y, z) = map.room_coords(&id);
            println!("Room {}: {}", id, map.room_name(&id));
            println!("  coords: ({}, {}, {})", x, y, z);
            let data = map.room_data(&id);
            if !data.is_empty() {
                println!("  data: {}", String::from_utf8_lossy(data));
            }
            for (keyword, dest) in map.room_exits(&id) {
                println!("  {} -> {} {}", keyword, dest, map.room_name(&dest));
            }
        }
        ("find", [needle]) => {
            for (id, name) in map.find_rooms_by_name(needle) {
                println!("{}\t{}", id, name);
            }
        }
        ("path", [from, to]) => {
            let (from, to) = (RoomId::parse(from), RoomId::parse(to));
            let path = map.find_path(&from, &to);
            if path.is_empty() && from != to {
                eprintln!("No path from {} to {}", from, to);
                std::process::exit(1);
            }
            println!("{}", path.join(" "));
            println!("{}", speedwalk(&path));
        }
        _ => {
            usage(program);
            std::process::exit(1);
        }
    }

    Ok(())
}
