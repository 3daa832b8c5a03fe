//! Tests for the tile picker

#[cfg(test)]
mod tests {
    use mosaictile::catalog::TileId;
    use mosaictile::spatial::Cell;
    use mosaictile::tools::{CanvasTool, CursorHint, PaintSurface, Picker, PointerButton};
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::super::GridSurface;

    // Tests picking selects the tile under the pointer and notifies
    #[test]
    fn test_pick_selects_tile() {
        let mut surface = GridSurface::new(4, 4);
        surface.paint_cell(Cell::new(2, 3), TileId::new(7));
        let picked = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&picked);
        let mut picker = Picker::new();
        picker.set_on_pick(move |tile| log.borrow_mut().push(tile));

        picker.on_press(&mut surface, Cell::new(2, 3), PointerButton::Primary);
        assert_eq!(surface.selected_tile(), Some(TileId::new(7)));

        picker.on_drag(&mut surface, Cell::new(0, 0), PointerButton::Primary);
        assert_eq!(surface.selected_tile(), Some(TileId::new(0)));
        assert_eq!(*picked.borrow(), vec![TileId::new(7), TileId::new(0)]);
    }

    // Tests picking outside the grid keeps the selection
    #[test]
    fn test_pick_outside_grid() {
        let mut surface = GridSurface::new(2, 2);
        let mut picker = Picker::default();
        picker.on_press(&mut surface, Cell::new(-1, 0), PointerButton::Primary);
        picker.on_press(&mut surface, Cell::new(0, 0), PointerButton::Middle);
        picker.on_release(&mut surface, Cell::new(0, 0), PointerButton::Primary);

        assert_eq!(surface.selected_tile(), Some(TileId::new(1)));
        assert_eq!(surface.strokes_finished, 0);
        assert_eq!(picker.cursor_hint(), CursorHint::Eyedropper);
        assert!(format!("{picker:?}").contains("on_pick: false"));
    }
}
