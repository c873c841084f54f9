//! End-to-end checks of the documented behaviors: preprocessing fidelity,
//! number and bus facts, include resolution, and netlist linking.

use std::fs;
use std::io::Write;
use verinet::core::lang::{self, LanguageStandard};
use verinet::core::preproc::error::PreprocError;
use verinet::core::preproc::Preproc;
use verinet::core::source::SourceError;
use verinet::diagnostic::DiagnosticKind;
use verinet::{Netlist, PortDirection};

const STD: LanguageStandard = LanguageStandard::Sv2017;

#[test]
fn debug_counter_design_links_clean() {
    let text = "\
`define DEBUG 1
`define WIDTH 32
module test_module (input clk, input rst, output reg [WIDTH-1:0] count);
`ifdef DEBUG
  initial $display(\"Debug mode enabled\");
`endif
endmodule
";
    let mut netlist = Netlist::new(STD);
    netlist.read_str(text, "test.v").unwrap();
    netlist.link().unwrap();

    let m = netlist.find_module("test_module").unwrap();
    let ports: Vec<(&str, PortDirection, Option<&str>)> = m
        .ports()
        .iter()
        .map(|p| (p.name(), p.direction_or_default(), p.range()))
        .collect();
    assert_eq!(
        ports,
        vec![
            ("clk", PortDirection::Input, None),
            ("rst", PortDirection::Input, None),
            ("count", PortDirection::Output, Some("[31:0]")),
        ]
    );
    assert_eq!(m.ports()[2].net_type(), Some("reg"));
    let tops: Vec<&str> = netlist.top_modules().iter().map(|m| m.name()).collect();
    assert_eq!(tops, vec!["test_module"]);
    assert!(netlist.diagnostics().is_empty());
}

#[test]
fn macro_rescan_reaches_fixpoint() {
    let mut p = Preproc::new(STD);
    let out = p
        .preprocess_str("`define A `B\n`define B 7\n$info(`A);\n", "t.v")
        .unwrap();
    assert_eq!(out.lines().last().unwrap(), "$info(7);");
}

#[test]
fn number_literal_facts() {
    assert_eq!(lang::number_value("8'hFF").unwrap(), (255, false));
    assert_eq!(lang::number_bits("8'hFF").unwrap(), 8);
    assert_eq!(lang::number_signed("8'shFF").unwrap(), true);
    assert_eq!(lang::number_value("4'b1x1").unwrap(), (5, true));
}

#[test]
fn bus_ranges_enumerate_in_direction() {
    assert_eq!(
        lang::split_bus("[3:0]").unwrap(),
        vec!["[3]", "[2]", "[1]", "[0]"]
    );
    assert_eq!(lang::split_bus("[0:2]").unwrap(), vec!["[0]", "[1]", "[2]"]);
}

#[test]
fn include_search_prefers_source_directory_then_flags() {
    let root = tempfile::tempdir().unwrap();
    let inc = root.path().join("inc");
    fs::create_dir(&inc).unwrap();
    write!(
        fs::File::create(inc.join("hdr.vh")).unwrap(),
        "`define FROM_INC 1\n"
    )
    .unwrap();
    let top = root.path().join("top.v");
    write!(
        fs::File::create(&top).unwrap(),
        "`include \"hdr.vh\"\nmodule m;\nendmodule\n"
    )
    .unwrap();

    let mut p = Preproc::new(STD).with_include_paths(vec![inc.clone()]);
    p.preprocess_file(top.to_str().unwrap()).unwrap();
    assert!(p.defines().is_defined("FROM_INC"));

    // neither beside the source nor on the include path: both are reported
    let missing = root.path().join("missing.v");
    write!(
        fs::File::create(&missing).unwrap(),
        "`include \"nope.vh\"\n"
    )
    .unwrap();
    let mut p = Preproc::new(STD).with_include_paths(vec![inc]);
    let err = p.preprocess_file(missing.to_str().unwrap()).unwrap_err();
    match err {
        PreprocError::Source(SourceError::IncludeNotFound { searched, .. }) => {
            assert_eq!(searched.len(), 2);
        }
        other => panic!("expected IncludeNotFound, got {:?}", other),
    }
}

#[test]
fn black_box_instantiation_links_with_one_warning() {
    let mut netlist = Netlist::new(STD);
    netlist
        .read_str(
            "module top;\n  wire x;\n  unknown_sub u0 (.a(x));\nendmodule\n",
            "top.v",
        )
        .unwrap();
    netlist.link().unwrap();
    let top = netlist.find_module("top").unwrap();
    assert_eq!(top.cells()[0].submodule(), None);
    assert_eq!(
        netlist
            .diagnostics()
            .count_of(DiagnosticKind::UnresolvedSubmodule),
        1
    );
    assert_eq!(netlist.diagnostics().len(), 1);
}

#[test]
fn directive_free_text_round_trips() {
    let text = "module m (input a);\n  wire b;\n  assign b = a;\nendmodule\n";
    let mut p = Preproc::new(STD);
    assert_eq!(p.preprocess_str(text, "t.v").unwrap(), text);
}

#[test]
fn surviving_lines_keep_their_numbers() {
    let text = "\
`define ON 1
line `__LINE__
`ifdef OFF
dark
`else
line `__LINE__
`endif
line `__LINE__
";
    let mut p = Preproc::new(STD);
    let out = p.preprocess_str(text, "t.v").unwrap();
    let lines: Vec<&str> = out.split('\n').collect();
    // every surviving sentinel names its own physical line
    assert_eq!(lines[1], "line 2");
    assert_eq!(lines[5], "line 6");
    assert_eq!(lines[7], "line 8");
    // elided regions leave blanks, keeping the count stable
    assert_eq!(lines.len(), text.split('\n').count());
}

#[test]
fn balanced_conditionals_never_error() {
    let text = "\
`ifdef A
`ifdef B
x
`endif
`elsif C
y
`else
z
`endif
";
    let mut p = Preproc::new(STD);
    assert!(p.preprocess_str(text, "t.v").is_ok());
}

#[test]
fn preprocessing_is_idempotent_over_its_own_output() {
    let text = "\
`define WIDTH 32
`define NAME counter
module NAME (output [WIDTH-1:0] q);
endmodule
";
    let mut first = Preproc::new(STD);
    let once = first.preprocess_str(text, "t.v").unwrap();

    let seeds: Vec<(String, String)> = first
        .defines()
        .iter()
        .map(|d| (d.name().to_string(), d.body().to_string()))
        .collect();
    let mut second = Preproc::new(STD).with_defines(seeds);
    let twice = second.preprocess_str(&once, "t.v").unwrap();
    assert_eq!(once, twice);
}

#[test]
fn named_pins_resolve_on_every_linked_cell() {
    let text = "\
module leaf (input a, input b, output y);
endmodule
module mid (input a, output y);
  wire t;
  leaf l0 (.a(a), .b(t), .y(y));
endmodule
module top;
  wire p, q;
  mid m0 (.a(p), .y(q));
endmodule
";
    let mut netlist = Netlist::new(STD);
    netlist.read_str(text, "design.v").unwrap();
    netlist.link().unwrap();

    for m in netlist.modules() {
        for c in m.cells() {
            if c.submodule().is_none() {
                continue;
            }
            for p in c.pins() {
                if p.net_expr().is_empty() == false {
                    assert!(
                        p.resolved_port().is_some(),
                        "pin {:?} of {} unresolved",
                        p.binding(),
                        c.instance()
                    );
                }
            }
        }
    }
}

#[test]
fn every_module_is_reachable_from_the_top_set() {
    let text = "\
module leaf ();
endmodule
module mid ();
  leaf l0 ();
endmodule
module top ();
  mid m0 ();
  leaf l1 ();
endmodule
";
    let mut netlist = Netlist::new(STD);
    netlist.read_str(text, "design.v").unwrap();
    netlist.link().unwrap();

    let tops: Vec<&str> = netlist.top_modules().iter().map(|m| m.name()).collect();
    assert_eq!(tops, vec!["top"]);

    let mut reached: Vec<&str> = Vec::new();
    let mut stack: Vec<&str> = tops.clone();
    while let Some(name) = stack.pop() {
        if reached.contains(&name) == true {
            continue;
        }
        reached.push(name);
        for c in netlist.find_module(name).unwrap().cells() {
            if let Some(id) = c.submodule() {
                stack.push(netlist.module(id).name());
            }
        }
    }
    for m in netlist.modules() {
        assert!(reached.contains(&m.name()), "{} unreachable", m.name());
    }
}

#[test]
fn multi_file_design_links_across_files() {
    let root = tempfile::tempdir().unwrap();
    let leaf = root.path().join("leaf.v");
    write!(
        fs::File::create(&leaf).unwrap(),
        "module leaf (input d, output q);\nendmodule\n"
    )
    .unwrap();
    let top = root.path().join("top.v");
    write!(
        fs::File::create(&top).unwrap(),
        "module top;\n  wire a, b;\n  leaf u0 (.d(a), .q(b));\nendmodule\n"
    )
    .unwrap();

    let mut netlist = Netlist::new(STD);
    netlist.read_file(leaf.to_str().unwrap()).unwrap();
    netlist.read_file(top.to_str().unwrap()).unwrap();
    netlist.link().unwrap();

    assert!(netlist.find_module("top").unwrap().cells()[0]
        .submodule()
        .is_some());
    assert_eq!(netlist.files_read().len(), 2);
    assert_eq!(
        netlist.find_module("leaf").unwrap().is_instantiated(),
        true
    );
}
