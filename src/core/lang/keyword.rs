use super::LanguageStandard;
use std::fmt::Display;
use std::str::FromStr;

/// The IEEE revision that first reserved a word. A keyword is reserved in a
/// given standard iff the standard includes its tier.
#[derive(Debug, PartialEq, Clone, Copy)]
enum Tier {
    V1995,
    V2001,
    V2005,
    Sv2005,
    Sv2009,
    Sv2012,
    Vams,
}

impl Tier {
    fn reserved_in(&self, standard: LanguageStandard) -> bool {
        use LanguageStandard::*;
        match self {
            Self::V1995 => true,
            Self::V2001 => standard != V1995,
            Self::V2005 => match standard {
                V1995 | V2001 => false,
                _ => true,
            },
            Self::Sv2005 => standard.is_system_verilog(),
            Self::Sv2009 => match standard {
                Sv2009 | Sv2012 | Sv2017 | Sv2023 => true,
                _ => false,
            },
            Self::Sv2012 => match standard {
                Sv2012 | Sv2017 | Sv2023 => true,
                _ => false,
            },
            Self::Vams => standard == Vams,
        }
    }
}

#[derive(Debug, PartialEq, Clone, Eq, Hash)]
pub enum Keyword {
    // IEEE 1364-1995
    Always,
    And,
    Assign,
    Begin,
    Buf,
    Bufif0,
    Bufif1,
    Case,
    Casex,
    Casez,
    Cmos,
    Deassign,
    Default,
    Defparam,
    Disable,
    Edge,
    Else,
    End,
    Endcase,
    Endfunction,
    Endmodule,
    Endprimitive,
    Endspecify,
    Endtable,
    Endtask,
    Event,
    For,
    Force,
    Forever,
    Fork,
    Function,
    Highz0,
    Highz1,
    If,
    Ifnone,
    Initial,
    Inout,
    Input,
    Integer,
    Join,
    Large,
    Macromodule,
    Medium,
    Module,
    Nand,
    Negedge,
    Nmos,
    Nor,
    Not,
    Notif0,
    Notif1,
    Or,
    Output,
    Parameter,
    Pmos,
    Posedge,
    Primitive,
    Pull0,
    Pull1,
    Pulldown,
    Pullup,
    Rcmos,
    Real,
    Realtime,
    Reg,
    Release,
    Repeat,
    Rnmos,
    Rpmos,
    Rtran,
    Rtranif0,
    Rtranif1,
    Scalared,
    Small,
    Specify,
    Specparam,
    Strong0,
    Strong1,
    Supply0,
    Supply1,
    Table,
    Task,
    Time,
    Tran,
    Tranif0,
    Tranif1,
    Tri,
    Tri0,
    Tri1,
    Triand,
    Trior,
    Trireg,
    Vectored,
    Wait,
    Wand,
    Weak0,
    Weak1,
    While,
    Wire,
    Wor,
    Xnor,
    Xor,
    // IEEE 1364-2001
    Automatic,
    Cell,
    Config,
    Design,
    Endconfig,
    Endgenerate,
    Generate,
    Genvar,
    Incdir,
    Include,
    Instance,
    Liblist,
    Library,
    Localparam,
    Noshowcancelled,
    PulsestyleOndetect,
    PulsestyleOnevent,
    Showcancelled,
    Signed,
    Unsigned,
    Use,
    // IEEE 1364-2005
    Uwire,
    // IEEE 1800-2005
    Alias,
    AlwaysComb,
    AlwaysFf,
    AlwaysLatch,
    Assert,
    Assume,
    Before,
    Bind,
    Bins,
    Binsof,
    Bit,
    Break,
    Byte,
    Chandle,
    Class,
    Clocking,
    Const,
    Constraint,
    Context,
    Continue,
    Cover,
    Covergroup,
    Coverpoint,
    Cross,
    Dist,
    Do,
    Endclass,
    Endclocking,
    Endgroup,
    Endinterface,
    Endpackage,
    Endprogram,
    Endproperty,
    Endsequence,
    Enum,
    Expect,
    Export,
    Extends,
    Extern,
    Final,
    FirstMatch,
    Foreach,
    Forkjoin,
    Iff,
    IgnoreBins,
    IllegalBins,
    Import,
    Inside,
    Int,
    Interface,
    Intersect,
    JoinAny,
    JoinNone,
    Local,
    Logic,
    Longint,
    Matches,
    Modport,
    New,
    Null,
    Package,
    Packed,
    Priority,
    Program,
    Property,
    Protected,
    Pure,
    Rand,
    Randc,
    Randcase,
    Randsequence,
    Ref,
    Return,
    Sequence,
    Shortint,
    Shortreal,
    Solve,
    Static,
    String,
    Struct,
    Super,
    Tagged,
    This,
    Throughout,
    Timeprecision,
    Timeunit,
    Type,
    Typedef,
    Union,
    Unique,
    Var,
    Virtual,
    Void,
    WaitOrder,
    Wildcard,
    With,
    Within,
    // IEEE 1800-2009
    AcceptOn,
    Checker,
    Endchecker,
    Eventually,
    Global,
    Implies,
    Let,
    Nexttime,
    RejectOn,
    Restrict,
    SAlways,
    SEventually,
    SNexttime,
    SUntil,
    SUntilWith,
    Strong,
    SyncAcceptOn,
    SyncRejectOn,
    Unique0,
    Until,
    UntilWith,
    Untyped,
    Weak,
    // IEEE 1800-2012
    Implements,
    Interconnect,
    Nettype,
    Soft,
    // Verilog-AMS
    Analog,
    Branch,
    Discipline,
    Electrical,
    Enddiscipline,
    Endnature,
    Exclude,
    From,
    Ground,
    Inf,
    Nature,
    Wreal,
}

impl Keyword {
    /// Attempts to match `word` against the full reserved-word table,
    /// ignoring which standard reserves it.
    pub fn match_keyword(word: &str) -> Option<Self> {
        Self::from_str(word).ok()
    }

    /// Checks whether this word is reserved under `standard`.
    pub fn is_reserved_in(&self, standard: LanguageStandard) -> bool {
        self.tier().reserved_in(standard)
    }

    /// Checks if the keyword names a built-in gate primitive.
    pub fn is_gate_primitive(&self) -> bool {
        match self {
            Self::And
            | Self::Nand
            | Self::Or
            | Self::Nor
            | Self::Xor
            | Self::Xnor
            | Self::Buf
            | Self::Not
            | Self::Bufif0
            | Self::Bufif1
            | Self::Notif0
            | Self::Notif1
            | Self::Nmos
            | Self::Pmos
            | Self::Cmos
            | Self::Rnmos
            | Self::Rpmos
            | Self::Rcmos
            | Self::Tran
            | Self::Tranif0
            | Self::Tranif1
            | Self::Rtran
            | Self::Rtranif0
            | Self::Rtranif1
            | Self::Pullup
            | Self::Pulldown => true,
            _ => false,
        }
    }

    /// Checks if the keyword can introduce a net declaration.
    pub fn is_net_type(&self) -> bool {
        match self {
            Self::Wire
            | Self::Reg
            | Self::Logic
            | Self::Tri
            | Self::Tri0
            | Self::Tri1
            | Self::Triand
            | Self::Trior
            | Self::Trireg
            | Self::Supply0
            | Self::Supply1
            | Self::Uwire
            | Self::Wand
            | Self::Wor
            | Self::Wreal
            | Self::Interconnect => true,
            _ => false,
        }
    }

    /// Checks if the keyword is a port direction.
    pub fn is_direction(&self) -> bool {
        match self {
            Self::Input | Self::Output | Self::Inout | Self::Ref => true,
            _ => false,
        }
    }

    fn tier(&self) -> Tier {
        use Keyword::*;
        match self {
            Always | And | Assign | Begin | Buf | Bufif0 | Bufif1 | Case | Casex | Casez
            | Cmos | Deassign | Default | Defparam | Disable | Edge | Else | End | Endcase
            | Endfunction | Endmodule | Endprimitive | Endspecify | Endtable | Endtask | Event
            | For | Force | Forever | Fork | Function | Highz0 | Highz1 | If | Ifnone
            | Initial | Inout | Input | Integer | Join | Large | Macromodule | Medium
            | Module | Nand | Negedge | Nmos | Nor | Not | Notif0 | Notif1 | Or | Output
            | Parameter | Pmos | Posedge | Primitive | Pull0 | Pull1 | Pulldown | Pullup
            | Rcmos | Real | Realtime | Reg | Release | Repeat | Rnmos | Rpmos | Rtran
            | Rtranif0 | Rtranif1 | Scalared | Small | Specify | Specparam | Strong0
            | Strong1 | Supply0 | Supply1 | Table | Task | Time | Tran | Tranif0 | Tranif1
            | Tri | Tri0 | Tri1 | Triand | Trior | Trireg | Vectored | Wait | Wand | Weak0
            | Weak1 | While | Wire | Wor | Xnor | Xor => Tier::V1995,
            Automatic | Cell | Config | Design | Endconfig | Endgenerate | Generate | Genvar
            | Incdir | Include | Instance | Liblist | Library | Localparam | Noshowcancelled
            | PulsestyleOndetect | PulsestyleOnevent | Showcancelled | Signed | Unsigned
            | Use => Tier::V2001,
            Uwire => Tier::V2005,
            Alias | AlwaysComb | AlwaysFf | AlwaysLatch | Assert | Assume | Before | Bind
            | Bins | Binsof | Bit | Break | Byte | Chandle | Class | Clocking | Const
            | Constraint | Context | Continue | Cover | Covergroup | Coverpoint | Cross
            | Dist | Do | Endclass | Endclocking | Endgroup | Endinterface | Endpackage
            | Endprogram | Endproperty | Endsequence | Enum | Expect | Export | Extends
            | Extern | Final | FirstMatch | Foreach | Forkjoin | Iff | IgnoreBins
            | IllegalBins | Import | Inside | Int | Interface | Intersect | JoinAny
            | JoinNone | Local | Logic | Longint | Matches | Modport | New | Null | Package
            | Packed | Priority | Program | Property | Protected | Pure | Rand | Randc
            | Randcase | Randsequence | Ref | Return | Sequence | Shortint | Shortreal
            | Solve | Static | String | Struct | Super | Tagged | This | Throughout
            | Timeprecision | Timeunit | Type | Typedef | Union | Unique | Var | Virtual
            | Void | WaitOrder | Wildcard | With | Within => Tier::Sv2005,
            AcceptOn | Checker | Endchecker | Eventually | Global | Implies | Let | Nexttime
            | RejectOn | Restrict | SAlways | SEventually | SNexttime | SUntil | SUntilWith
            | Strong | SyncAcceptOn | SyncRejectOn | Unique0 | Until | UntilWith | Untyped
            | Weak => Tier::Sv2009,
            Implements | Interconnect | Nettype | Soft => Tier::Sv2012,
            Analog | Branch | Discipline | Electrical | Enddiscipline | Endnature | Exclude
            | From | Ground | Inf | Nature | Wreal => Tier::Vams,
        }
    }

    pub fn as_str(&self) -> &str {
        use Keyword::*;
        match self {
            Always => "always",
            And => "and",
            Assign => "assign",
            Begin => "begin",
            Buf => "buf",
            Bufif0 => "bufif0",
            Bufif1 => "bufif1",
            Case => "case",
            Casex => "casex",
            Casez => "casez",
            Cmos => "cmos",
            Deassign => "deassign",
            Default => "default",
            Defparam => "defparam",
            Disable => "disable",
            Edge => "edge",
            Else => "else",
            End => "end",
            Endcase => "endcase",
            Endfunction => "endfunction",
            Endmodule => "endmodule",
            Endprimitive => "endprimitive",
            Endspecify => "endspecify",
            Endtable => "endtable",
            Endtask => "endtask",
            Event => "event",
            For => "for",
            Force => "force",
            Forever => "forever",
            Fork => "fork",
            Function => "function",
            Highz0 => "highz0",
            Highz1 => "highz1",
            If => "if",
            Ifnone => "ifnone",
            Initial => "initial",
            Inout => "inout",
            Input => "input",
            Integer => "integer",
            Join => "join",
            Large => "large",
            Macromodule => "macromodule",
            Medium => "medium",
            Module => "module",
            Nand => "nand",
            Negedge => "negedge",
            Nmos => "nmos",
            Nor => "nor",
            Not => "not",
            Notif0 => "notif0",
            Notif1 => "notif1",
            Or => "or",
            Output => "output",
            Parameter => "parameter",
            Pmos => "pmos",
            Posedge => "posedge",
            Primitive => "primitive",
            Pull0 => "pull0",
            Pull1 => "pull1",
            Pulldown => "pulldown",
            Pullup => "pullup",
            Rcmos => "rcmos",
            Real => "real",
            Realtime => "realtime",
            Reg => "reg",
            Release => "release",
            Repeat => "repeat",
            Rnmos => "rnmos",
            Rpmos => "rpmos",
            Rtran => "rtran",
            Rtranif0 => "rtranif0",
            Rtranif1 => "rtranif1",
            Scalared => "scalared",
            Small => "small",
            Specify => "specify",
            Specparam => "specparam",
            Strong0 => "strong0",
            Strong1 => "strong1",
            Supply0 => "supply0",
            Supply1 => "supply1",
            Table => "table",
            Task => "task",
            Time => "time",
            Tran => "tran",
            Tranif0 => "tranif0",
            Tranif1 => "tranif1",
            Tri => "tri",
            Tri0 => "tri0",
            Tri1 => "tri1",
            Triand => "triand",
            Trior => "trior",
            Trireg => "trireg",
            Vectored => "vectored",
            Wait => "wait",
            Wand => "wand",
            Weak0 => "weak0",
            Weak1 => "weak1",
            While => "while",
            Wire => "wire",
            Wor => "wor",
            Xnor => "xnor",
            Xor => "xor",
            Automatic => "automatic",
            Cell => "cell",
            Config => "config",
            Design => "design",
            Endconfig => "endconfig",
            Endgenerate => "endgenerate",
            Generate => "generate",
            Genvar => "genvar",
            Incdir => "incdir",
            Include => "include",
            Instance => "instance",
            Liblist => "liblist",
            Library => "library",
            Localparam => "localparam",
            Noshowcancelled => "noshowcancelled",
            PulsestyleOndetect => "pulsestyle_ondetect",
            PulsestyleOnevent => "pulsestyle_onevent",
            Showcancelled => "showcancelled",
            Signed => "signed",
            Unsigned => "unsigned",
            Use => "use",
            Uwire => "uwire",
            Alias => "alias",
            AlwaysComb => "always_comb",
            AlwaysFf => "always_ff",
            AlwaysLatch => "always_latch",
            Assert => "assert",
            Assume => "assume",
            Before => "before",
            Bind => "bind",
            Bins => "bins",
            Binsof => "binsof",
            Bit => "bit",
            Break => "break",
            Byte => "byte",
            Chandle => "chandle",
            Class => "class",
            Clocking => "clocking",
            Const => "const",
            Constraint => "constraint",
            Context => "context",
            Continue => "continue",
            Cover => "cover",
            Covergroup => "covergroup",
            Coverpoint => "coverpoint",
            Cross => "cross",
            Dist => "dist",
            Do => "do",
            Endclass => "endclass",
            Endclocking => "endclocking",
            Endgroup => "endgroup",
            Endinterface => "endinterface",
            Endpackage => "endpackage",
            Endprogram => "endprogram",
            Endproperty => "endproperty",
            Endsequence => "endsequence",
            Enum => "enum",
            Expect => "expect",
            Export => "export",
            Extends => "extends",
            Extern => "extern",
            Final => "final",
            FirstMatch => "first_match",
            Foreach => "foreach",
            Forkjoin => "forkjoin",
            Iff => "iff",
            IgnoreBins => "ignore_bins",
            IllegalBins => "illegal_bins",
            Import => "import",
            Inside => "inside",
            Int => "int",
            Interface => "interface",
            Intersect => "intersect",
            JoinAny => "join_any",
            JoinNone => "join_none",
            Local => "local",
            Logic => "logic",
            Longint => "longint",
            Matches => "matches",
            Modport => "modport",
            New => "new",
            Null => "null",
            Package => "package",
            Packed => "packed",
            Priority => "priority",
            Program => "program",
            Property => "property",
            Protected => "protected",
            Pure => "pure",
            Rand => "rand",
            Randc => "randc",
            Randcase => "randcase",
            Randsequence => "randsequence",
            Ref => "ref",
            Return => "return",
            Sequence => "sequence",
            Shortint => "shortint",
            Shortreal => "shortreal",
            Solve => "solve",
            Static => "static",
            String => "string",
            Struct => "struct",
            Super => "super",
            Tagged => "tagged",
            This => "this",
            Throughout => "throughout",
            Timeprecision => "timeprecision",
            Timeunit => "timeunit",
            Type => "type",
            Typedef => "typedef",
            Union => "union",
            Unique => "unique",
            Var => "var",
            Virtual => "virtual",
            Void => "void",
            WaitOrder => "wait_order",
            Wildcard => "wildcard",
            With => "with",
            Within => "within",
            AcceptOn => "accept_on",
            Checker => "checker",
            Endchecker => "endchecker",
            Eventually => "eventually",
            Global => "global",
            Implies => "implies",
            Let => "let",
            Nexttime => "nexttime",
            RejectOn => "reject_on",
            Restrict => "restrict",
            SAlways => "s_always",
            SEventually => "s_eventually",
            SNexttime => "s_nexttime",
            SUntil => "s_until",
            SUntilWith => "s_until_with",
            Strong => "strong",
            SyncAcceptOn => "sync_accept_on",
            SyncRejectOn => "sync_reject_on",
            Unique0 => "unique0",
            Until => "until",
            UntilWith => "until_with",
            Untyped => "untyped",
            Weak => "weak",
            Implements => "implements",
            Interconnect => "interconnect",
            Nettype => "nettype",
            Soft => "soft",
            Analog => "analog",
            Branch => "branch",
            Discipline => "discipline",
            Electrical => "electrical",
            Enddiscipline => "enddiscipline",
            Endnature => "endnature",
            Exclude => "exclude",
            From => "from",
            Ground => "ground",
            Inf => "inf",
            Nature => "nature",
            Wreal => "wreal",
        }
    }
}

impl FromStr for Keyword {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use Keyword::*;
        Ok(match s {
            "always" => Always,
            "and" => And,
            "assign" => Assign,
            "begin" => Begin,
            "buf" => Buf,
            "bufif0" => Bufif0,
            "bufif1" => Bufif1,
            "case" => Case,
            "casex" => Casex,
            "casez" => Casez,
            "cmos" => Cmos,
            "deassign" => Deassign,
            "default" => Default,
            "defparam" => Defparam,
            "disable" => Disable,
            "edge" => Edge,
            "else" => Else,
            "end" => End,
            "endcase" => Endcase,
            "endfunction" => Endfunction,
            "endmodule" => Endmodule,
            "endprimitive" => Endprimitive,
            "endspecify" => Endspecify,
            "endtable" => Endtable,
            "endtask" => Endtask,
            "event" => Event,
            "for" => For,
            "force" => Force,
            "forever" => Forever,
            "fork" => Fork,
            "function" => Function,
            "highz0" => Highz0,
            "highz1" => Highz1,
            "if" => If,
            "ifnone" => Ifnone,
            "initial" => Initial,
            "inout" => Inout,
            "input" => Input,
            "integer" => Integer,
            "join" => Join,
            "large" => Large,
            "macromodule" => Macromodule,
            "medium" => Medium,
            "module" => Module,
            "nand" => Nand,
            "negedge" => Negedge,
            "nmos" => Nmos,
            "nor" => Nor,
            "not" => Not,
            "notif0" => Notif0,
            "notif1" => Notif1,
            "or" => Or,
            "output" => Output,
            "parameter" => Parameter,
            "pmos" => Pmos,
            "posedge" => Posedge,
            "primitive" => Primitive,
            "pull0" => Pull0,
            "pull1" => Pull1,
            "pulldown" => Pulldown,
            "pullup" => Pullup,
            "rcmos" => Rcmos,
            "real" => Real,
            "realtime" => Realtime,
            "reg" => Reg,
            "release" => Release,
            "repeat" => Repeat,
            "rnmos" => Rnmos,
            "rpmos" => Rpmos,
            "rtran" => Rtran,
            "rtranif0" => Rtranif0,
            "rtranif1" => Rtranif1,
            "scalared" => Scalared,
            "small" => Small,
            "specify" => Specify,
            "specparam" => Specparam,
            "strong0" => Strong0,
            "strong1" => Strong1,
            "supply0" => Supply0,
            "supply1" => Supply1,
            "table" => Table,
            "task" => Task,
            "time" => Time,
            "tran" => Tran,
            "tranif0" => Tranif0,
            "tranif1" => Tranif1,
            "tri" => Tri,
            "tri0" => Tri0,
            "tri1" => Tri1,
            "triand" => Triand,
            "trior" => Trior,
            "trireg" => Trireg,
            "vectored" => Vectored,
            "wait" => Wait,
            "wand" => Wand,
            "weak0" => Weak0,
            "weak1" => Weak1,
            "while" => While,
            "wire" => Wire,
            "wor" => Wor,
            "xnor" => Xnor,
            "xor" => Xor,
            "automatic" => Automatic,
            "cell" => Cell,
            "config" => Config,
            "design" => Design,
            "endconfig" => Endconfig,
            "endgenerate" => Endgenerate,
            "generate" => Generate,
            "genvar" => Genvar,
            "incdir" => Incdir,
            "include" => Include,
            "instance" => Instance,
            "liblist" => Liblist,
            "library" => Library,
            "localparam" => Localparam,
            "noshowcancelled" => Noshowcancelled,
            "pulsestyle_ondetect" => PulsestyleOndetect,
            "pulsestyle_onevent" => PulsestyleOnevent,
            "showcancelled" => Showcancelled,
            "signed" => Signed,
            "unsigned" => Unsigned,
            "use" => Use,
            "uwire" => Uwire,
            "alias" => Alias,
            "always_comb" => AlwaysComb,
            "always_ff" => AlwaysFf,
            "always_latch" => AlwaysLatch,
            "assert" => Assert,
            "assume" => Assume,
            "before" => Before,
            "bind" => Bind,
            "bins" => Bins,
            "binsof" => Binsof,
            "bit" => Bit,
            "break" => Break,
            "byte" => Byte,
            "chandle" => Chandle,
            "class" => Class,
            "clocking" => Clocking,
            "const" => Const,
            "constraint" => Constraint,
            "context" => Context,
            "continue" => Continue,
            "cover" => Cover,
            "covergroup" => Covergroup,
            "coverpoint" => Coverpoint,
            "cross" => Cross,
            "dist" => Dist,
            "do" => Do,
            "endclass" => Endclass,
            "endclocking" => Endclocking,
            "endgroup" => Endgroup,
            "endinterface" => Endinterface,
            "endpackage" => Endpackage,
            "endprogram" => Endprogram,
            "endproperty" => Endproperty,
            "endsequence" => Endsequence,
            "enum" => Enum,
            "expect" => Expect,
            "export" => Export,
            "extends" => Extends,
            "extern" => Extern,
            "final" => Final,
            "first_match" => FirstMatch,
            "foreach" => Foreach,
            "forkjoin" => Forkjoin,
            "iff" => Iff,
            "ignore_bins" => IgnoreBins,
            "illegal_bins" => IllegalBins,
            "import" => Import,
            "inside" => Inside,
            "int" => Int,
            "interface" => Interface,
            "intersect" => Intersect,
            "join_any" => JoinAny,
            "join_none" => JoinNone,
            "local" => Local,
            "logic" => Logic,
            "longint" => Longint,
            "matches" => Matches,
            "modport" => Modport,
            "new" => New,
            "null" => Null,
            "package" => Package,
            "packed" => Packed,
            "priority" => Priority,
            "program" => Program,
            "property" => Property,
            "protected" => Protected,
            "pure" => Pure,
            "rand" => Rand,
            "randc" => Randc,
            "randcase" => Randcase,
            "randsequence" => Randsequence,
            "ref" => Ref,
            "return" => Return,
            "sequence" => Sequence,
            "shortint" => Shortint,
            "shortreal" => Shortreal,
            "solve" => Solve,
            "static" => Static,
            "string" => String,
            "struct" => Struct,
            "super" => Super,
            "tagged" => Tagged,
            "this" => This,
            "throughout" => Throughout,
            "timeprecision" => Timeprecision,
            "timeunit" => Timeunit,
            "type" => Type,
            "typedef" => Typedef,
            "union" => Union,
            "unique" => Unique,
            "var" => Var,
            "virtual" => Virtual,
            "void" => Void,
            "wait_order" => WaitOrder,
            "wildcard" => Wildcard,
            "with" => With,
            "within" => Within,
            "accept_on" => AcceptOn,
            "checker" => Checker,
            "endchecker" => Endchecker,
            "eventually" => Eventually,
            "global" => Global,
            "implies" => Implies,
            "let" => Let,
            "nexttime" => Nexttime,
            "reject_on" => RejectOn,
            "restrict" => Restrict,
            "s_always" => SAlways,
            "s_eventually" => SEventually,
            "s_nexttime" => SNexttime,
            "s_until" => SUntil,
            "s_until_with" => SUntilWith,
            "strong" => Strong,
            "sync_accept_on" => SyncAcceptOn,
            "sync_reject_on" => SyncRejectOn,
            "unique0" => Unique0,
            "until" => Until,
            "until_with" => UntilWith,
            "untyped" => Untyped,
            "weak" => Weak,
            "implements" => Implements,
            "interconnect" => Interconnect,
            "nettype" => Nettype,
            "soft" => Soft,
            "analog" => Analog,
            "branch" => Branch,
            "discipline" => Discipline,
            "electrical" => Electrical,
            "enddiscipline" => Enddiscipline,
            "endnature" => Endnature,
            "exclude" => Exclude,
            "from" => From,
            "ground" => Ground,
            "inf" => Inf,
            "nature" => Nature,
            "wreal" => Wreal,
            _ => return Err(()),
        })
    }
}

impl Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ut_standard_gating() {
        let logic = Keyword::match_keyword("logic").unwrap();
        assert_eq!(logic.is_reserved_in(LanguageStandard::V2001), false);
        assert_eq!(logic.is_reserved_in(LanguageStandard::Sv2005), true);

        let genvar = Keyword::match_keyword("genvar").unwrap();
        assert_eq!(genvar.is_reserved_in(LanguageStandard::V1995), false);
        assert_eq!(genvar.is_reserved_in(LanguageStandard::V2001), true);

        let checker = Keyword::match_keyword("checker").unwrap();
        assert_eq!(checker.is_reserved_in(LanguageStandard::Sv2005), false);
        assert_eq!(checker.is_reserved_in(LanguageStandard::Sv2012), true);

        let wreal = Keyword::match_keyword("wreal").unwrap();
        assert_eq!(wreal.is_reserved_in(LanguageStandard::Vams), true);
        assert_eq!(wreal.is_reserved_in(LanguageStandard::Sv2017), false);
    }

    #[test]
    fn ut_round_trip_spelling() {
        for word in ["module", "endmodule", "always_comb", "s_until_with", "uwire"] {
            let kw = Keyword::match_keyword(word).unwrap();
            assert_eq!(kw.as_str(), word);
        }
        assert_eq!(Keyword::match_keyword("not_a_keyword"), None);
    }

    #[test]
    fn ut_gate_primitives() {
        assert_eq!(Keyword::Nand.is_gate_primitive(), true);
        assert_eq!(Keyword::Pullup.is_gate_primitive(), true);
        assert_eq!(Keyword::Module.is_gate_primitive(), false);
    }
}
