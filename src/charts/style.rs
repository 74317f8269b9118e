//! Shared chart styling for the dark dashboard theme

use serde_json::{json, Value};

pub const AXIS_LINE_COLOR: &str = "#5470c6";
pub const AXIS_LABEL_COLOR: &str = "#ddd";
pub const LEGEND_TEXT_COLOR: &str = "#fff";
pub const SPLIT_LINE_COLOR: &str = "rgba(84, 112, 198, 0.2)";

pub const BLUE: &str = "#5470c6";
pub const GREEN: &str = "#91cc75";
pub const RED: &str = "#ee6666";

/// Grid that keeps axis labels inside the container
pub fn grid() -> Value {
    json!({
        "left": "3%",
        "right": "4%",
        "bottom": "3%",
        "containLabel": true
    })
}

pub fn legend(names: &[&str]) -> Value {
    json!({
        "data": names,
        "textStyle": { "color": LEGEND_TEXT_COLOR }
    })
}

pub fn axis_tooltip(pointer: &str) -> Value {
    json!({
        "trigger": "axis",
        "axisPointer": { "type": pointer }
    })
}

/// Category axis with rotated date labels
pub fn date_axis(dates: &[&str]) -> Value {
    json!({
        "type": "category",
        "data": dates,
        "axisLabel": { "color": AXIS_LABEL_COLOR, "rotate": 45 },
        "axisLine": { "lineStyle": { "color": AXIS_LINE_COLOR } }
    })
}

/// Category axis listing district names
pub fn name_axis(names: &[&str]) -> Value {
    json!({
        "type": "category",
        "data": names,
        "axisLabel": { "color": AXIS_LABEL_COLOR },
        "axisLine": { "lineStyle": { "color": AXIS_LINE_COLOR } }
    })
}

pub fn value_axis() -> Value {
    json!({
        "type": "value",
        "axisLabel": { "color": AXIS_LABEL_COLOR },
        "axisLine": { "lineStyle": { "color": AXIS_LINE_COLOR } },
        "splitLine": { "lineStyle": { "color": SPLIT_LINE_COLOR } }
    })
}

/// Named value axis with its own line and split colors
pub fn named_value_axis(name: &str, line_color: &str, split_color: &str) -> Value {
    json!({
        "type": "value",
        "name": name,
        "axisLabel": { "color": AXIS_LABEL_COLOR },
        "axisLine": { "lineStyle": { "color": line_color } },
        "splitLine": { "lineStyle": { "color": split_color } }
    })
}

/// Linear gradient in the chart library's plain-object form.
/// `(x2, y2)` is the end point in the unit box; stops are `(offset, color)`.
pub fn linear_gradient(x2: f64, y2: f64, stops: &[(f64, &str)]) -> Value {
    let color_stops: Vec<Value> = stops
        .iter()
        .map(|(offset, color)| json!({ "offset": offset, "color": color }))
        .collect();

    json!({
        "type": "linear",
        "x": 0,
        "y": 0,
        "x2": x2,
        "y2": y2,
        "colorStops": color_stops
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_gradient() {
        let gradient = linear_gradient(0.0, 1.0, &[(0.0, "#aa4b6b"), (1.0, "#6b6b83")]);
        assert_eq!(gradient["type"], "linear");
        assert_eq!(gradient["y2"], 1.0);
        assert_eq!(gradient["colorStops"][1]["color"], "#6b6b83");
    }

    #[test]
    fn test_date_axis() {
        let axis = date_axis(&["2025-03-22", "2025-03-23"]);
        assert_eq!(axis["data"][1], "2025-03-23");
        assert_eq!(axis["axisLabel"]["rotate"], 45);
    }
}
