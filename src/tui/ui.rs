//! Screen composition: where the panel, main area and mask go, and what a
//! click at a given cell lands on.
//!
//! ```text
//! desktop                      compact (panel open)
//! ┌────────┬──────────────┐    ┌────────┬──────────────┐
//! │ panel  │ main         │    │ panel  │ mask (dim)   │
//! │        │              │    │        │  main below  │
//! └────────┴──────────────┘    └────────┴──────────────┘
//! ```

use chrono::{DateTime, Utc};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use crate::core::panel::{PanelController, PanelMode, RenderModel};
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{MainArea, NavLayout, NavPanel, NavTarget};

/// Where each top-level element sits for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenLayout {
    pub panel: Option<Rect>,
    pub main: Rect,
    pub mask: Option<Rect>,
}

/// What a click landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Nav(NavTarget),
    Mask,
    Main,
}

/// Columns needed to show `units` logical units.
pub fn units_to_columns(units: u16, cell_width: u16) -> u16 {
    units.div_ceil(cell_width.max(1))
}

impl ScreenLayout {
    pub fn compute(area: Rect, model: &RenderModel<'_>, cell_width: u16) -> Self {
        let columns = units_to_columns(model.width_units, cell_width).min(area.width);
        let panel_rect = Rect::new(area.x, area.y, columns, area.height);
        let rest = Rect::new(
            area.x + columns,
            area.y,
            area.width - columns,
            area.height,
        );

        match model.mode {
            PanelMode::Hidden => Self {
                panel: None,
                main: area,
                mask: None,
            },
            PanelMode::VisibleDesktop => Self {
                panel: Some(panel_rect),
                main: rest,
                mask: None,
            },
            // Overlay: main keeps the full area underneath
            PanelMode::VisibleMobile => Self {
                panel: Some(panel_rect),
                main: area,
                mask: (model.mask == Some(true)).then_some(rest),
            },
        }
    }

    pub fn hit_test(&self, nav: &NavLayout, col: u16, row: u16) -> Option<Hit> {
        let inside = |r: Rect| col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height;
        if let Some(panel) = self.panel
            && inside(panel)
        {
            return nav.hit_test(col, row).map(Hit::Nav);
        }
        if let Some(mask) = self.mask
            && inside(mask)
        {
            return Some(Hit::Mask);
        }
        inside(self.main).then_some(Hit::Main)
    }
}

pub fn draw_ui(frame: &mut Frame, panel: &PanelController, tui: &mut TuiState, now: DateTime<Utc>) {
    let model = panel.render_model();
    let screen = ScreenLayout::compute(frame.area(), &model, tui.cell_width);
    tui.screen = screen;

    MainArea::new(&tui.view, model.search_text).render(frame, screen.main);

    if let Some(mask) = screen.mask {
        frame
            .buffer_mut()
            .set_style(mask, Style::default().add_modifier(Modifier::DIM));
    }

    match screen.panel {
        Some(area) => {
            let mut nav = NavPanel::new(
                &model,
                &mut tui.search,
                &mut tui.list,
                panel.scroll_offset(),
                panel.user(),
                now,
            );
            nav.render(frame, area);
            tui.nav_layout = nav.layout;
        }
        None => tui.nav_layout = NavLayout::default(),
    }
}
