/// Line colors, assigned to series in order and wrapping around.
pub const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd",
    "#8c564b", "#e377c2", "#7f7f7f", "#bcbd22", "#17becf",
];

/// The color of the `index`-th series. Pure, so the same index always gets the same color.
pub fn color_for(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}
