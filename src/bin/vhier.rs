use clap::Parser;
use colored::Colorize;
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use verinet::core::lang::{self, LanguageStandard};
use verinet::core::netlist::module::Module;
use verinet::core::netlist::Netlist;
use verinet::error::{EXIT_IO, EXIT_LINK, EXIT_OK, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "vhier")]
#[command(about = "Display the module hierarchy of Verilog/SystemVerilog sources")]
#[command(version)]
struct Cli {
    /// Define a macro before processing (repeatable)
    #[arg(short = 'D', value_name = "NAME[=VALUE]")]
    defines: Vec<String>,

    /// Undefine a macro (repeatable)
    #[arg(short = 'U', value_name = "NAME")]
    undefines: Vec<String>,

    /// Add an include search path (repeatable)
    #[arg(short = 'I', value_name = "PATH")]
    include_paths: Vec<PathBuf>,

    /// Language standard (1364-1995 .. 1800-2023, vams)
    #[arg(long, value_name = "STD")]
    standard: Option<String>,

    /// Restrict output to the hierarchy under this module
    #[arg(long, value_name = "NAME")]
    top_module: Option<String>,

    /// List module names only
    #[arg(long)]
    modules: bool,

    /// List the cell hierarchy indented by depth (the default)
    #[arg(long)]
    cells: bool,

    /// Emit module TAB file lines
    #[arg(long)]
    module_files: bool,

    /// List the input files that were read
    #[arg(long)]
    input_files: bool,

    /// Emit the hierarchy as an XML tree
    #[arg(long)]
    xml: bool,

    /// Append each cell's submodule name in the tree
    #[arg(long)]
    instance: bool,

    /// Treat link findings (unknown ports, unresolved cells) as fatal
    #[arg(long)]
    strict: bool,

    /// Write output to a file instead of stdout
    #[arg(short = 'o', value_name = "PATH")]
    output: Option<PathBuf>,

    /// Input files, processed in order
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,
}

fn main() -> ExitCode {
    ExitCode::from(run() as u8)
}

fn run() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.use_stderr() {
                true => EXIT_USAGE,
                false => EXIT_OK,
            };
        }
    };

    let standard = match &cli.standard {
        Some(s) => match s.parse::<LanguageStandard>() {
            Ok(std) => std,
            Err(e) => {
                eprintln!("{}: {}", "error".red().bold(), e);
                return EXIT_USAGE;
            }
        },
        None => lang::language_standard(),
    };

    let mut netlist = Netlist::new(standard)
        .with_defines(cli.defines.iter().map(|d| split_define(d)).collect())
        .with_include_paths(gather_include_paths(cli.include_paths.clone()));
    for name in &cli.undefines {
        netlist.undefine(name);
    }

    for file in &cli.files {
        if let Err(e) = netlist.read_file(&file.to_string_lossy()) {
            eprintln!("{}: {}", "error".red().bold(), e);
            return verinet::error::Error::from(e).exit_code();
        }
    }
    if let Err(e) = netlist.link() {
        eprintln!("{}: {}", "error".red().bold(), e);
        return verinet::error::Error::from(e).exit_code();
    }
    for d in netlist.diagnostics().iter() {
        eprintln!("{}", d.render());
    }

    let roots: Vec<&Module> = match &cli.top_module {
        Some(name) => match netlist.find_module(name) {
            Some(m) => vec![m],
            None => {
                eprintln!(
                    "{}: unknown module \"{}\" requested as top",
                    "error".red().bold(),
                    name
                );
                return EXIT_USAGE;
            }
        },
        None => netlist.top_modules(),
    };

    let mut text = String::new();
    let any_mode = cli.modules || cli.cells || cli.module_files || cli.input_files;
    if cli.xml == true {
        text.push_str("<vhier>\n");
    }
    if cli.cells == true || any_mode == false {
        if cli.xml == true {
            text.push_str(" <cells>\n");
            for root in &roots {
                write_xml_tree(&mut text, &netlist, *root, 2);
            }
            text.push_str(" </cells>\n");
        } else {
            for root in &roots {
                write_tree(&mut text, &netlist, *root, None, 0, cli.instance, &mut Vec::new());
            }
        }
    }
    if cli.modules == true {
        let listed = reachable(&netlist, &roots, cli.top_module.is_some());
        if cli.xml == true {
            text.push_str(" <modules>\n");
            for m in &listed {
                text.push_str(&format!("  <module>{}</module>\n", xml_escape(m.name())));
            }
            text.push_str(" </modules>\n");
        } else {
            for m in &listed {
                text.push_str(m.name());
                text.push('\n');
            }
        }
    }
    if cli.module_files == true {
        let listed = reachable(&netlist, &roots, cli.top_module.is_some());
        if cli.xml == true {
            text.push_str(" <module_files>\n");
            for m in &listed {
                text.push_str(&format!(
                    "  <module_file module=\"{}\" file=\"{}\"/>\n",
                    xml_escape(m.name()),
                    xml_escape(&m.origin().file)
                ));
            }
            text.push_str(" </module_files>\n");
        } else {
            for m in &listed {
                text.push_str(&format!("{}\t{}\n", m.name(), m.origin().file));
            }
        }
    }
    if cli.input_files == true {
        if cli.xml == true {
            text.push_str(" <input_files>\n");
            for f in netlist.files_read() {
                text.push_str(&format!("  <file>{}</file>\n", xml_escape(f)));
            }
            text.push_str(" </input_files>\n");
        } else {
            for f in netlist.files_read() {
                text.push_str(f);
                text.push('\n');
            }
        }
    }
    if cli.xml == true {
        text.push_str("</vhier>\n");
    }

    let wrote = match &cli.output {
        Some(path) => fs::File::create(path)
            .and_then(|mut f| f.write_all(text.as_bytes()))
            .map_err(|e| format!("failed to write {:?}: {}", path, e)),
        None => std::io::stdout()
            .write_all(text.as_bytes())
            .map_err(|e| e.to_string()),
    };
    if let Err(e) = wrote {
        eprintln!("{}: {}", "error".red().bold(), e);
        return EXIT_IO;
    }

    if cli.strict == true && netlist.diagnostics().is_empty() == false {
        return EXIT_LINK;
    }
    EXIT_OK
}

/// Prints one hierarchy node and recurses through resolved cells. The
/// `path` guard stops runaway recursion on (illegal) instantiation cycles.
fn write_tree(
    out: &mut String,
    netlist: &Netlist,
    module: &Module,
    instance: Option<&str>,
    depth: usize,
    show_submodule: bool,
    path: &mut Vec<String>,
) {
    let indent = "  ".repeat(depth);
    match instance {
        Some(inst) => {
            let label = match show_submodule {
                true => format!("{} ({})", inst, module.name()),
                false => inst.to_string(),
            };
            out.push_str(&format!("{}{}\n", indent, label));
        }
        None => out.push_str(&format!("{}{}\n", indent, module.name())),
    }
    if path.contains(&module.name().to_string()) == true {
        return;
    }
    path.push(module.name().to_string());
    for cell in module.cells() {
        match cell.submodule() {
            Some(id) => write_tree(
                out,
                netlist,
                netlist.module(id),
                Some(cell.instance()),
                depth + 1,
                show_submodule,
                path,
            ),
            None => {
                let label = match show_submodule {
                    true => format!("{} ({})", cell.instance(), cell.submodule_name()),
                    false => cell.instance().to_string(),
                };
                out.push_str(&format!("{}{}\n", "  ".repeat(depth + 1), label));
            }
        }
    }
    path.pop();
}

fn write_xml_tree(out: &mut String, netlist: &Netlist, module: &Module, depth: usize) {
    let indent = " ".repeat(depth);
    if module.cells().is_empty() == true {
        out.push_str(&format!(
            "{}<module name=\"{}\"/>\n",
            indent,
            xml_escape(module.name())
        ));
        return;
    }
    out.push_str(&format!(
        "{}<module name=\"{}\">\n",
        indent,
        xml_escape(module.name())
    ));
    for cell in module.cells() {
        out.push_str(&format!(
            "{} <cell name=\"{}\" module=\"{}\">\n",
            indent,
            xml_escape(cell.instance()),
            xml_escape(cell.submodule_name())
        ));
        if let Some(id) = cell.submodule() {
            write_xml_tree(out, netlist, netlist.module(id), depth + 2);
        }
        out.push_str(&format!("{} </cell>\n", indent));
    }
    out.push_str(&format!("{}</module>\n", indent));
}

/// The modules to list: everything in declaration order, or the transitive
/// closure under the chosen roots when `--top-module` narrows the view.
fn reachable<'a>(netlist: &'a Netlist, roots: &Vec<&'a Module>, narrowed: bool) -> Vec<&'a Module> {
    if narrowed == false {
        return netlist.modules().collect();
    }
    let mut seen: HashSet<String> = HashSet::new();
    let mut stack: Vec<&Module> = roots.clone();
    while let Some(m) = stack.pop() {
        if seen.insert(m.name().to_string()) == false {
            continue;
        }
        for cell in m.cells() {
            if let Some(id) = cell.submodule() {
                stack.push(netlist.module(id));
            }
        }
    }
    netlist
        .modules()
        .filter(|m| seen.contains(m.name()))
        .collect()
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn split_define(arg: &str) -> (String, String) {
    match arg.split_once('=') {
        Some((name, value)) => (name.to_string(), value.to_string()),
        None => (arg.to_string(), String::from("1")),
    }
}

fn gather_include_paths(mut paths: Vec<PathBuf>) -> Vec<PathBuf> {
    if let Ok(extra) = std::env::var("VERILOG_INCLUDE") {
        paths.extend(
            extra
                .split(':')
                .filter(|p| p.is_empty() == false)
                .map(PathBuf::from),
        );
    }
    paths
}
