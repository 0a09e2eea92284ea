//! Debug renderer: load a design through the module and describe it as shapes
//!
//! The design payload is opaque to the host. The module parses it into an
//! arena record plus an array of block records in its own memory; the host
//! only decodes those records.

use anyhow::{Context, Result};
use fcsim_shared::abi::{EXPORT_READ_XML, EXPORT_SIM_NEW};
use fcsim_shared::{ArenaDef, BlockDef, BlockKind, Rect};

use crate::error::BridgeError;
use crate::gl::GlApi;
use crate::memory::MemoryView;
use crate::wasm::ModuleInstance;

/// Linear RGB, each channel in 0..=1
pub type Color = [f32; 3];

pub const SKY_COLOR: Color = [0.529, 0.741, 0.945];
pub const BUILD_AREA_COLOR: Color = [0.737, 0.859, 0.976];
pub const GOAL_AREA_COLOR: Color = [0.945, 0.569, 0.569];

/// Fill color per block kind, indexed by type tag
const BLOCK_COLORS: [Color; 11] = [
    [0.000, 0.745, 0.004],
    [0.000, 0.745, 0.004],
    [0.976, 0.855, 0.184],
    [0.976, 0.537, 0.184],
    [1.000, 0.400, 0.400],
    [1.000, 0.400, 0.400],
    [0.537, 0.980, 0.890],
    [1.000, 0.925, 0.000],
    [1.000, 0.800, 0.800],
    [0.000, 0.000, 1.000],
    [0.420, 0.204, 0.000],
];

/// Rectangles thinner than this are drawn at this size
pub const MIN_RECT_SIDE: f64 = 4.0;

pub fn block_color(kind: BlockKind) -> Color {
    BLOCK_COLORS[kind.tag() as usize]
}

/// Geometry of one filled shape, in design units
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Axis-aligned area from its bottom-left corner
    Area {
        left: f64,
        bottom: f64,
        width: f64,
        height: f64,
    },
    Circle { x: f64, y: f64, radius: f64 },
    /// Rotated rectangle corners in drawing order
    Quad([[f64; 2]; 4]),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilledShape {
    pub shape: Shape,
    pub color: Color,
    /// Id of the block the shape came from; `None` for areas
    pub block_id: Option<i32>,
}

/// A decoded design, back to front
#[derive(Debug, Clone, PartialEq)]
pub struct DebugScene {
    pub background: Color,
    pub arena: ArenaDef,
    pub blocks: Vec<BlockDef>,
    pub shapes: Vec<FilledShape>,
}

impl DebugScene {
    pub fn new(arena: ArenaDef, blocks: Vec<BlockDef>) -> Self {
        let mut shapes = Vec::with_capacity(blocks.len() + 2);
        shapes.push(area_shape(&arena.build, BUILD_AREA_COLOR));
        shapes.push(area_shape(&arena.goal, GOAL_AREA_COLOR));
        shapes.extend(blocks.iter().map(block_shape));

        Self {
            background: SKY_COLOR,
            arena,
            blocks,
            shapes,
        }
    }
}

fn area_shape(rect: &Rect, color: Color) -> FilledShape {
    FilledShape {
        shape: Shape::Area {
            left: rect.left(),
            bottom: rect.bottom(),
            width: rect.w,
            height: rect.h,
        },
        color,
        block_id: None,
    }
}

fn block_shape(block: &BlockDef) -> FilledShape {
    let shape = if block.kind.is_circle() {
        Shape::Circle {
            x: block.x,
            y: block.y,
            radius: block.w / 2.0,
        }
    } else {
        Shape::Quad(rotated_rect(block))
    };
    FilledShape {
        shape,
        color: block_color(block.kind),
        block_id: Some(block.id),
    }
}

fn rotated_rect(block: &BlockDef) -> [[f64; 2]; 4] {
    let (sin, cos) = block.angle.sin_cos();
    let w = block.w.max(MIN_RECT_SIDE);
    let h = block.h.max(MIN_RECT_SIDE);
    let (wc, ws) = (w * cos / 2.0, w * sin / 2.0);
    let (hc, hs) = (h * cos / 2.0, h * sin / 2.0);
    let (x, y) = (block.x, block.y);
    [
        [wc - hs + x, ws + hc + y],
        [-wc - hs + x, -ws + hc + y],
        [-wc + hs + x, -ws - hc + y],
        [wc + hs + x, ws - hc + y],
    ]
}

/// Result of [`ModuleInstance::load_design`]
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDesign {
    /// Arena record in module memory
    pub arena_ptr: u32,
    /// Simulation handle from `fcsim_new`, when the module exports it
    pub simulation: Option<u32>,
    pub scene: DebugScene,
}

impl<G: GlApi> ModuleInstance<G> {
    /// Have the module parse `xml` and decode what it produced
    pub fn load_design(&mut self, xml: &[u8]) -> Result<LoadedDesign> {
        let read_xml = self
            .read_xml_export()
            .ok_or(BridgeError::MissingExport(EXPORT_READ_XML))?;

        let xml_ptr = self.stage_bytes(xml).context("Failed to stage design")?;
        let arena_ptr = self.malloc(ArenaDef::SIZE as u32)?;

        let status = read_xml
            .call(self.store_mut(), (xml_ptr, arena_ptr))
            .with_context(|| format!("WASM {}() failed", EXPORT_READ_XML))?;
        if status != 0 {
            return Err(BridgeError::DesignRejected(status).into());
        }

        let simulation = match self.sim_new_export() {
            Some(sim_new) => Some(
                sim_new
                    .call(self.store_mut(), arena_ptr)
                    .with_context(|| format!("WASM {}() failed", EXPORT_SIM_NEW))?,
            ),
            None => None,
        };

        let (arena, blocks) = self.decode_arena(arena_ptr)?;
        tracing::debug!(
            "Loaded design: {} blocks, arena at {:#x}",
            blocks.len(),
            arena_ptr
        );

        Ok(LoadedDesign {
            arena_ptr,
            simulation,
            scene: DebugScene::new(arena, blocks),
        })
    }

    /// Decode the arena record at `arena_ptr` and the blocks it points at
    pub fn decode_arena(&self, arena_ptr: u32) -> Result<(ArenaDef, Vec<BlockDef>)> {
        let view = MemoryView::new(self.memory_bytes()?);
        let arena = ArenaDef::decode(view.window(arena_ptr, ArenaDef::SIZE as u32)?.bytes())
            .map_err(BridgeError::from)?;

        let blocks_len = u32::try_from(arena.blocks_len()).map_err(|_| BridgeError::OutOfBounds {
            offset: arena.blocks_ptr as u64,
            len: arena.blocks_len(),
            size: view.len() as u64,
        })?;
        let blocks = view
            .window(arena.blocks_ptr, blocks_len)?
            .bytes()
            .chunks_exact(BlockDef::SIZE)
            .map(BlockDef::decode)
            .collect::<Result<Vec<_>, _>>()
            .map_err(BridgeError::from)?;

        Ok((arena, blocks))
    }
}
