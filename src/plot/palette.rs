use plotters::style::RGBColor;

/// The nine-colour "Set1" qualitative map.
const SET1: [RGBColor; 9] = [
    RGBColor(228, 26, 28),
    RGBColor(55, 126, 184),
    RGBColor(77, 175, 74),
    RGBColor(152, 78, 163),
    RGBColor(255, 127, 0),
    RGBColor(255, 255, 51),
    RGBColor(166, 86, 40),
    RGBColor(247, 129, 191),
    RGBColor(153, 153, 153),
];

/// `size` colours spread evenly from the first to the last Set1 entry.
pub fn palette(size: usize) -> Vec<RGBColor> {
    let size = size.max(1);
    if size == 1 {
        return vec![SET1[0]];
    }
    let last = SET1.len() - 1;
    (0..size)
        .map(|i| {
            let position = i as f64 / (size - 1) as f64;
            let idx = ((position * SET1.len() as f64) as usize).min(last);
            SET1[idx]
        })
        .collect()
}
