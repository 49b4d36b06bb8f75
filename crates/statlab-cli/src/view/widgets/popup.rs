use ratatui::layout::{Constraint, Flex, Layout, Rect};

/// A centred area of the given size within `area`.
pub fn popup_area(area: Rect, width: Constraint, height: Constraint) -> Rect {
    let [area] = Layout::vertical([height]).flex(Flex::Center).areas(area);
    let [area] = Layout::horizontal([width]).flex(Flex::Center).areas(area);
    area
}
