//! Output assembly
//!
//! Both targets are always loaded: the RAM graph drives the RAM sections
//! and the build summary, the ROM graph drives the ROM sections and the
//! native declarations. Nothing is written here; [`GeneratedOutputs`] is
//! returned whole so a failure leaves no partial files behind.

use crate::build_info::BuildInfo;
use crate::error::GenResult;
use crate::inputs::Inputs;
use crate::summary::BuildSummary;
use builtin_meta::{FinalizedGraph, MetadataLoader, Target};
use gen_support::csource::quote_bytes;
use gen_support::CSourceWriter;
use ram_encoder::{emit, RamEncoder};
use rom_generator::{RomGenerator, ROMPTR_FIRST};
use std::collections::HashSet;
use tracing::{debug, info};

const GENERATOR_NAME: &str = "genbuiltins";

const ROM_DISABLED: &str = "#error ROM support not enabled, rerun genbuiltins with --rom-support";

/// Rendered output files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedOutputs {
    /// C header text
    pub header: String,
    /// C source text
    pub source: String,
    /// Build metadata JSON
    pub metadata_json: String,
    /// Finalized RAM metadata, when requested
    pub ram_dump: Option<String>,
    /// Finalized ROM metadata, when requested
    pub rom_dump: Option<String>,
}

/// Drives loading, encoding and rendering
#[derive(Debug, Clone)]
pub struct Generator {
    loader: MetadataLoader,
    build_info: BuildInfo,
    initjs: Vec<u8>,
    rom_support: bool,
    dump_ram: bool,
    dump_rom: bool,
}

impl Generator {
    /// Create a generator over parsed inputs
    pub fn new(inputs: Inputs) -> Self {
        let loader = MetadataLoader::new(inputs.bases)
            .with_overrides(inputs.overrides)
            .with_used_stridx(inputs.used_stridx)
            .with_build_version(inputs.build_info.version);
        Generator {
            loader,
            build_info: inputs.build_info,
            initjs: inputs.initjs,
            rom_support: false,
            dump_ram: false,
            dump_rom: false,
        }
    }

    /// Emit ROM initializers instead of `#error` stubs
    pub fn with_rom_support(mut self, enabled: bool) -> Self {
        self.rom_support = enabled;
        self
    }

    /// Render JSON dumps of the finalized graphs
    pub fn with_dumps(mut self, ram: bool, rom: bool) -> Self {
        self.dump_ram = ram;
        self.dump_rom = rom;
        self
    }

    /// Load both targets and render every output
    pub fn generate(&self) -> GenResult<GeneratedOutputs> {
        let ram = self.loader.load(Target::Ram)?;
        let rom = self.loader.load(Target::Rom)?;

        let ram_data = RamEncoder::new(&ram).encode()?;
        let rom_gen = RomGenerator::new(&rom);

        let mut source = CSourceWriter::new();
        source.emit_header(GENERATOR_NAME);
        source.emit_line("#include \"duk_internal.h\"");
        source.emit_line("");
        source.emit_line("#if defined(DUK_USE_ROM_STRINGS)");
        if self.rom_support {
            rom_gen.emit_source(&mut source)?;
        } else {
            source.emit_line(ROM_DISABLED);
        }
        source.emit_line("#else  /* DUK_USE_ROM_STRINGS */");
        ram_data.emit_strings_source(&mut source);
        source.emit_line("#endif  /* DUK_USE_ROM_STRINGS */");
        source.emit_line("");
        source.emit_line("#if defined(DUK_USE_ROM_OBJECTS)");
        if self.rom_support {
            source.emit_line("#if !defined(DUK_USE_ROM_STRINGS)");
            source.emit_line("#error DUK_USE_ROM_OBJECTS requires DUK_USE_ROM_STRINGS");
            source.emit_line("#endif");
        } else {
            source.emit_line(ROM_DISABLED);
        }
        source.emit_line("#else  /* DUK_USE_ROM_OBJECTS */");
        ram_data.emit_natives_source(&mut source);
        emit::emit_initjs_source(&mut source, &self.initjs);
        ram_data.emit_objects_source(&mut source);
        source.emit_line("#endif  /* DUK_USE_ROM_OBJECTS */");

        let mut header = CSourceWriter::new();
        header.emit_header(GENERATOR_NAME);
        header.emit_line("#ifndef DUK_BUILTINS_H_INCLUDED");
        header.emit_line("#define DUK_BUILTINS_H_INCLUDED");
        header.emit_line("");
        header.emit_line("#if defined(DUK_USE_ROM_STRINGS)");
        if self.rom_support {
            emit_stridx_defines(&mut header, &rom);
            rom_gen.emit_strings_header(&mut header);
        } else {
            header.emit_line(ROM_DISABLED);
        }
        header.emit_line("#else  /* DUK_USE_ROM_STRINGS */");
        emit_stridx_defines(&mut header, &ram);
        ram_data.emit_strings_header(&mut header);
        header.emit_line("#endif  /* DUK_USE_ROM_STRINGS */");
        header.emit_line("");
        header.emit_line("#if defined(DUK_USE_ROM_OBJECTS)");
        if self.rom_support {
            header.emit_line("#if !defined(DUK_USE_ROM_PTRCOMP_FIRST)");
            header.emit_line("#error missing DUK_USE_ROM_PTRCOMP_FIRST define");
            header.emit_line("#endif");
            header.emit_line(format!(
                "#if (DUK_USE_ROM_PTRCOMP_FIRST != {}L)",
                ROMPTR_FIRST
            ));
            header.emit_line(format!(
                "#error DUK_USE_ROM_PTRCOMP_FIRST must match the genbuiltins ROM pointer base ({}), update manually and regenerate",
                ROMPTR_FIRST
            ));
            header.emit_line("#endif");
            emit_native_declarations(&mut header, &rom);
            rom_gen.emit_objects_header(&mut header);
        } else {
            header.emit_line(ROM_DISABLED);
        }
        header.emit_line("#else  /* DUK_USE_ROM_OBJECTS */");
        emit_native_declarations(&mut header, &rom);
        ram_data.emit_natives_header(&mut header);
        emit::emit_initjs_header(&mut header, &self.initjs);
        ram_data.emit_bidx_header(&mut header);
        ram_data.emit_objects_header(&mut header);
        header.emit_line("#endif  /* DUK_USE_ROM_OBJECTS */");
        header.emit_line("#endif  /* DUK_BUILTINS_H_INCLUDED */");

        let metadata_json = BuildSummary::new(&ram, &self.build_info).to_json()?;

        let ram_dump = if self.dump_ram {
            Some(ram.to_json_pretty()?)
        } else {
            None
        };
        let rom_dump = if self.dump_rom {
            Some(rom.to_json_pretty()?)
        } else {
            None
        };

        debug!(
            "rendered {} header lines, {} source lines",
            header.line_count(),
            source.line_count()
        );
        info!(
            "generated {} ({} strings with stridx, {} bidx objects)",
            if self.rom_support { "RAM and ROM init data" } else { "RAM init data" },
            ram.stridx_count(),
            ram.bidx_objects().len()
        );

        Ok(GeneratedOutputs {
            header: header.into_string(),
            source: source.into_string(),
            metadata_json,
            ram_dump,
            rom_dump,
        })
    }
}

/// `DUK_STRIDX_xxx` defines, heap/thread accessors and reserved word range
pub fn emit_stridx_defines(w: &mut CSourceWriter, graph: &FinalizedGraph) {
    for (idx, s) in graph.stridx_strings().enumerate() {
        let Some(define) = s.define.as_deref() else {
            continue;
        };
        w.emit_define_commented(define, idx, &quote_bytes(&s.bytes));
        let suffix = define.replacen("DUK_STRIDX", "", 1);
        w.emit_line(format!(
            "#define DUK_HEAP_STRING{}(heap) DUK_HEAP_GET_STRING((heap),{})",
            suffix, define
        ));
        w.emit_line(format!(
            "#define DUK_HTHREAD_STRING{}(thr) DUK_HTHREAD_GET_STRING((thr),{})",
            suffix, define
        ));
    }
    w.emit_line("");

    let reserved = graph.reserved_range();
    w.emit_define("DUK_HEAP_NUM_STRINGS", graph.stridx_count());
    w.emit_define("DUK_STRIDX_START_RESERVED", reserved.start);
    w.emit_define("DUK_STRIDX_START_STRICT_RESERVED", reserved.strict_start);
    w.emit_define_commented("DUK_STRIDX_END_RESERVED", reserved.end, "exclusive endpoint");
    w.emit_line("");
    w.emit_line("/* To convert a heap stridx to a token number, subtract");
    w.emit_line(" * DUK_STRIDX_START_RESERVED and add DUK_TOK_START_RESERVED.");
    w.emit_line(" */");
}

/// Prototypes for every native function, in object order
pub fn emit_native_declarations(w: &mut CSourceWriter, graph: &FinalizedGraph) {
    let mut seen = HashSet::new();
    for native in graph.objects().iter().filter_map(|o| o.native.as_deref()) {
        if !seen.insert(native) {
            continue;
        }
        if native.starts_with("duk_") {
            w.emit_line(format!(
                "DUK_INTERNAL_DECL duk_ret_t {}(duk_context *ctx);",
                native
            ));
        } else {
            w.emit_line(format!("extern duk_ret_t {}(duk_context *ctx);", native));
        }
    }
}
