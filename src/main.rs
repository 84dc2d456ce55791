use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Result;

use fex::explorer::{DeleteMode, Explorer, RenamePlan};
use fex::locations::KnownLocation;
use fex::Config;

fn main() -> Result<()> {
  let args: Vec<String> = std::env::args().skip(1).collect();

  let mut show_help = false;
  let mut show_version = false;
  let mut show_init = false;
  let mut show_hidden = false;
  let mut path_arg: Option<String> = None;

  for arg in &args {
    match arg.as_str() {
      "--help" | "-h" => show_help = true,
      "--version" | "-V" => show_version = true,
      "--init" => show_init = true,
      "--all" | "-a" => show_hidden = true,
      a if !a.starts_with('-') => path_arg = Some(a.to_string()),
      _ => {
        eprintln!("fex: unknown option '{arg}'");
        std::process::exit(1);
      }
    }
  }

  if show_help {
    println!(concat!(
      "fex - file explorer core shell\n",
      "\n",
      "Usage: fex [options] [path]\n",
      "\n",
      "Options:\n",
      "  -a, --all      Show hidden files\n",
      "  --init         Write the default config file to ~/.config/fex/\n",
      "  -h, --help     Print this help message\n",
      "  -V, --version  Print version\n",
      "\n",
      "If no path is given, opens the current directory.\n",
      "Type 'help' at the prompt for the command list.",
    ));
    return Ok(());
  }

  if show_version {
    println!("fex {}", env!("CARGO_PKG_VERSION"));
    return Ok(());
  }

  if show_init {
    let config_path = Config::config_path()?;
    if config_path.exists() {
      eprint!("{} already exists. Overwrite? [y/N] ", config_path.display());
      if !read_yes()? {
        return Ok(());
      }
    }
    Config::dump_default_config(&config_path)?;
    println!("{}", config_path.display());
    return Ok(());
  }

  let (mut config, config_errors) = Config::load();
  for err in &config_errors {
    eprintln!("fex: {err}");
  }
  if show_hidden {
    config.show_hidden = true;
  }

  let root = path_arg
    .map(PathBuf::from)
    .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
  let root = std::fs::canonicalize(root)?;

  let mut explorer = Explorer::new(root, &config)?;
  println!("{}", explorer.status_line());

  let stdin = io::stdin();
  loop {
    // Pick up watcher refreshes and finished searches between commands
    let _ = explorer.on_tick();

    print!("fex> ");
    io::stdout().flush()?;
    let mut line = String::new();
    if stdin.lock().read_line(&mut line)? == 0 {
      break;
    }

    let mut parts = line.trim().splitn(2, ' ');
    let command = parts.next().unwrap_or("");
    let rest = parts.next().unwrap_or("").trim();

    let outcome = match command {
      "" => Ok(()),
      "quit" | "q" | "exit" => break,
      "help" => {
        print_command_help();
        Ok(())
      }
      "ls" => {
        print_listing(&explorer);
        Ok(())
      }
      "status" => {
        println!("{}", explorer.status_line());
        Ok(())
      }
      "cd" => run_cd(&mut explorer, rest),
      "back" => explorer.back().map(|moved| {
        if !moved {
          println!("history is empty");
        }
      }),
      "forward" => explorer.forward().map(|moved| {
        if !moved {
          println!("history is empty");
        }
      }),
      "go" => run_go(&mut explorer, rest),
      "search" => run_search(&mut explorer, rest),
      "copy" => explorer.copy_selection(resolve_all(&explorer, rest)),
      "cut" => explorer.cut_selection(resolve_all(&explorer, rest)),
      "paste" => run_paste(&mut explorer),
      "touch" => explorer.create_file(rest).map(|_| ()),
      "mkdir" => explorer.create_folder(rest).map(|_| ()),
      "mv" => run_rename(&mut explorer, rest),
      "rm" => run_delete(&mut explorer, rest, DeleteMode::Trash),
      "rm!" => run_delete(&mut explorer, rest, DeleteMode::Permanent),
      "open" => explorer.open_entry(&resolve(&explorer, rest)),
      "props" => run_props(&explorer, rest),
      "hidden" => {
        let show = !explorer.show_hidden();
        explorer.set_show_hidden(show).map(|()| {
          println!("hidden files: {}", if show { "shown" } else { "not shown" });
        })
      }
      "refresh" => explorer.refresh(),
      _ => {
        println!("unknown command '{command}' (try 'help')");
        Ok(())
      }
    };

    match outcome {
      Ok(()) => {
        if let Some(message) = explorer.status_message.take() {
          println!("{message}");
        }
      }
      Err(e) => println!("fex: {e}"),
    }
  }

  Ok(())
}

fn print_command_help() {
  println!(concat!(
    "  ls                    list the current directory (or search results)\n",
    "  cd <path>             navigate into a directory\n",
    "  back / forward        walk the navigation history\n",
    "  go <location>         jump to Home, Desktop, Documents, Downloads,\n",
    "                        Pictures, Music or Videos\n",
    "  search <text>         background filename search; 'search' alone clears\n",
    "  copy / cut <names>    fill the clipboard\n",
    "  paste                 paste into the current directory\n",
    "  touch / mkdir <name>  create a file / folder\n",
    "  mv <name> <new>       rename\n",
    "  rm <names>            move to trash; rm! deletes permanently\n",
    "  open <name>           open with the default application\n",
    "  props <name>          show properties\n",
    "  hidden                toggle hidden files\n",
    "  refresh / status / quit",
  ));
}

fn print_listing(explorer: &Explorer) {
  if explorer.search_active() {
    for hit in explorer.search_hits() {
      println!("{}  ({})", hit.name, hit.path.display());
    }
    println!("{} result(s)", explorer.search_hits().len());
    return;
  }
  for entry in explorer.entries() {
    let marker = if entry.is_dir { "/" } else { "" };
    println!("{}{marker}", entry.name);
  }
}

fn resolve(explorer: &Explorer, name: &str) -> PathBuf {
  let path = Path::new(name);
  if path.is_absolute() {
    path.to_path_buf()
  } else {
    explorer.current_dir().join(name)
  }
}

fn resolve_all(explorer: &Explorer, rest: &str) -> Vec<PathBuf> {
  rest
    .split_whitespace()
    .map(|name| resolve(explorer, name))
    .collect()
}

fn run_cd(explorer: &mut Explorer, rest: &str) -> fex::Result<()> {
  if rest == ".." {
    let Some(parent) = explorer.current_dir().parent().map(Path::to_path_buf) else {
      return Ok(());
    };
    return explorer.navigate_to(&parent);
  }
  let target = resolve(explorer, rest);
  explorer.navigate_to(&target)
}

fn run_go(explorer: &mut Explorer, rest: &str) -> fex::Result<()> {
  match KnownLocation::from_label(rest) {
    Some(location) => explorer.go_to_known(location),
    None => {
      println!("unknown location '{rest}'");
      Ok(())
    }
  }
}

fn run_search(explorer: &mut Explorer, rest: &str) -> fex::Result<()> {
  explorer.set_search_query(rest);
  if rest.is_empty() {
    println!("search cleared");
    return Ok(());
  }

  // Pump ticks until this search lands (debounce + walk)
  let deadline = Instant::now() + Duration::from_secs(30);
  loop {
    if explorer.on_tick()? && explorer.search_active() && !explorer.searching() {
      break;
    }
    if Instant::now() >= deadline {
      println!("search timed out");
      return Ok(());
    }
    std::thread::sleep(Duration::from_millis(25));
  }
  print_listing(explorer);
  Ok(())
}

fn run_paste(explorer: &mut Explorer) -> fex::Result<()> {
  let report = explorer.paste()?;
  for (path, err) in &report.failed {
    println!("failed: {}: {err}", path.display());
  }
  Ok(())
}

fn run_rename(explorer: &mut Explorer, rest: &str) -> fex::Result<()> {
  let mut parts = rest.split_whitespace();
  let (Some(name), Some(new_name)) = (parts.next(), parts.next()) else {
    println!("usage: mv <name> <new-name>");
    return Ok(());
  };
  let path = resolve(explorer, name);

  if let RenamePlan::ExtensionChange { old, new } = explorer.plan_rename(&path, new_name) {
    print!("Change extension .{old} -> .{new}? The file may become unusable. [y/N] ");
    let _ = io::stdout().flush();
    if !read_yes().unwrap_or(false) {
      return Ok(());
    }
  }
  explorer.rename(&path, new_name)
}

fn run_delete(explorer: &mut Explorer, rest: &str, mode: DeleteMode) -> fex::Result<()> {
  let paths = resolve_all(explorer, rest);
  if paths.is_empty() {
    return Ok(());
  }

  let prompt = match mode {
    DeleteMode::Permanent => "Permanently delete selected items? (This cannot be undone)",
    DeleteMode::Trash => "Delete selected items? (Moved to trash)",
  };
  print!("{prompt} [y/N] ");
  let _ = io::stdout().flush();
  if !read_yes().unwrap_or(false) {
    return Ok(());
  }

  let report = explorer.delete(&paths, mode)?;
  for (path, err) in &report.failed {
    println!("failed: {}: {err}", path.display());
  }
  Ok(())
}

fn run_props(explorer: &Explorer, rest: &str) -> fex::Result<()> {
  let props = explorer.properties(&resolve(explorer, rest))?;
  println!("Name:     {}", props.name);
  println!("Path:     {}", props.path);
  println!("Type:     {}", props.file_type);
  println!("Size:     {} ({} bytes)", props.size_human, props.size);
  if let Some(mime) = &props.mime_type {
    println!("Mime:     {mime}");
  }
  if let Some(count) = props.item_count {
    println!("Contains: {count} items");
  }
  if let Some(created) = &props.created {
    println!("Created:  {created}");
  }
  if let Some(modified) = &props.modified {
    println!("Modified: {modified}");
  }
  println!("Mode:     {} ({})", props.permissions_rwx, props.permissions_octal);
  println!("Owner:    {}:{}", props.owner, props.group);
  println!("Hidden:   {}", yes_no(props.hidden));
  println!("Readable: {}", yes_no(props.readable));
  println!("Writable: {}", yes_no(props.writable));
  if let Some(target) = &props.symlink_target {
    println!("Links to: {target}");
  }
  Ok(())
}

fn yes_no(value: bool) -> &'static str {
  if value { "Yes" } else { "No" }
}

fn read_yes() -> io::Result<bool> {
  let mut answer = String::new();
  io::stdin().read_line(&mut answer)?;
  Ok(answer.trim().eq_ignore_ascii_case("y"))
}
