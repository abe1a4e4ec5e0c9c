//! A loaded page: its raster plus its editable regions

use crate::coords::Rect;
use crate::raster::RasterHandle;
use crate::region::TextRegion;
use crate::service::TextBlock;

#[derive(Debug)]
pub struct Page {
    index: usize,
    raster: RasterHandle,
    regions: Vec<TextRegion>,
}

impl Page {
    /// Build a page from extracted blocks. Region ids follow block order.
    pub fn from_blocks(index: usize, raster: RasterHandle, blocks: Vec<TextBlock>) -> Self {
        let regions = blocks
            .into_iter()
            .enumerate()
            .map(|(id, block)| {
                TextRegion::new(
                    index,
                    id,
                    Rect::new(block.x, block.y, block.width, block.height),
                    block.text,
                )
            })
            .collect();

        Self {
            index,
            raster,
            regions,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn raster(&self) -> &RasterHandle {
        &self.raster
    }

    pub fn regions(&self) -> &[TextRegion] {
        &self.regions
    }

    pub fn region(&self, id: usize) -> Option<&TextRegion> {
        self.regions.get(id)
    }

    pub fn region_mut(&mut self, id: usize) -> Option<&mut TextRegion> {
        self.regions.get_mut(id)
    }

    pub(crate) fn regions_mut(&mut self) -> impl Iterator<Item = &mut TextRegion> {
        self.regions.iter_mut()
    }

    pub fn modified_count(&self) -> usize {
        self.regions.iter().filter(|r| r.is_modified()).count()
    }
}
