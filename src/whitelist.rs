//! Whitelists of permitted element names and attribute keys.
//!
//! Everything that is not in a whitelist is rejected.  Names are case-folded when
//! they go in and when they are looked up, so `<clipPath>` and `<clippath>` are the
//! same element as far as the validator is concerned.
//!
//! The default tables cover the SVG 1.1 / SVG 2 static vocabulary: shapes, text,
//! paint servers, filters, clipping and masking, and the presentation attributes.
//! They deliberately leave out anything that can run script or pull in foreign
//! content: `<script>`, `<foreignObject>`, the animation elements (which can
//! rewrite `href` at runtime), and every `on*` event handler attribute.

use std::collections::HashSet;

/// Elements allowed by default.
pub const DEFAULT_ELEMENTS: &[&str] = &[
    "a",
    "circle",
    "clippath",
    "defs",
    "desc",
    "ellipse",
    "feblend",
    "fecolormatrix",
    "fecomponenttransfer",
    "fecomposite",
    "feconvolvematrix",
    "fediffuselighting",
    "fedisplacementmap",
    "fedistantlight",
    "fedropshadow",
    "feflood",
    "fefunca",
    "fefuncb",
    "fefuncg",
    "fefuncr",
    "fegaussianblur",
    "feimage",
    "femerge",
    "femergenode",
    "femorphology",
    "feoffset",
    "fepointlight",
    "fespecularlighting",
    "fespotlight",
    "fetile",
    "feturbulence",
    "filter",
    "g",
    "image",
    "line",
    "lineargradient",
    "marker",
    "mask",
    "metadata",
    "path",
    "pattern",
    "polygon",
    "polyline",
    "radialgradient",
    "rect",
    "stop",
    "style",
    "svg",
    "switch",
    "symbol",
    "text",
    "textpath",
    "title",
    "tref",
    "tspan",
    "use",
    "view",
];

/// Attribute keys allowed by default.
///
/// Namespaced keys use their normalized prefix; see [`crate::xml::AttributeName`].
pub const DEFAULT_ATTRIBUTES: &[&str] = &[
    // namespace declarations
    "xmlns",
    "xmlns:xlink",
    "xmlns:svg",
    // core and structural
    "id",
    "xml:id",
    "xml:lang",
    "xml:space",
    "lang",
    "tabindex",
    "class",
    "style",
    "version",
    "baseprofile",
    "x",
    "y",
    "width",
    "height",
    "viewbox",
    "preserveaspectratio",
    "transform",
    "href",
    "xlink:href",
    "xlink:title",
    "xlink:type",
    "xlink:role",
    "xlink:arcrole",
    "xlink:show",
    "xlink:actuate",
    "target",
    "type",
    "media",
    "title",
    // conditional processing
    "requiredextensions",
    "requiredfeatures",
    "systemlanguage",
    // geometry
    "cx",
    "cy",
    "r",
    "rx",
    "ry",
    "x1",
    "y1",
    "x2",
    "y2",
    "d",
    "points",
    "pathlength",
    "dx",
    "dy",
    "rotate",
    "textlength",
    "lengthadjust",
    "startoffset",
    "method",
    "spacing",
    "side",
    "path",
    // paint servers, markers, clipping, masking
    "gradientunits",
    "gradienttransform",
    "spreadmethod",
    "fx",
    "fy",
    "fr",
    "offset",
    "patternunits",
    "patterncontentunits",
    "patterntransform",
    "markerunits",
    "markerwidth",
    "markerheight",
    "refx",
    "refy",
    "orient",
    "clippathunits",
    "maskunits",
    "maskcontentunits",
    // filters
    "filterunits",
    "primitiveunits",
    "in",
    "in2",
    "result",
    "mode",
    "operator",
    "k1",
    "k2",
    "k3",
    "k4",
    "values",
    "tablevalues",
    "slope",
    "intercept",
    "amplitude",
    "exponent",
    "stddeviation",
    "edgemode",
    "order",
    "kernelmatrix",
    "divisor",
    "bias",
    "targetx",
    "targety",
    "kernelunitlength",
    "preservealpha",
    "surfacescale",
    "diffuseconstant",
    "specularconstant",
    "specularexponent",
    "azimuth",
    "elevation",
    "z",
    "pointsatx",
    "pointsaty",
    "pointsatz",
    "limitingconeangle",
    "scale",
    "xchannelselector",
    "ychannelselector",
    "radius",
    "basefrequency",
    "numoctaves",
    "seed",
    "stitchtiles",
    // presentation attributes
    "alignment-baseline",
    "baseline-shift",
    "clip",
    "clip-path",
    "clip-rule",
    "color",
    "color-interpolation",
    "color-interpolation-filters",
    "color-profile",
    "color-rendering",
    "cursor",
    "direction",
    "display",
    "dominant-baseline",
    "enable-background",
    "fill",
    "fill-opacity",
    "fill-rule",
    "filter",
    "flood-color",
    "flood-opacity",
    "font",
    "font-family",
    "font-size",
    "font-size-adjust",
    "font-stretch",
    "font-style",
    "font-variant",
    "font-weight",
    "glyph-orientation-horizontal",
    "glyph-orientation-vertical",
    "image-rendering",
    "isolation",
    "kerning",
    "letter-spacing",
    "lighting-color",
    "marker",
    "marker-end",
    "marker-mid",
    "marker-start",
    "mask",
    "mask-type",
    "mix-blend-mode",
    "opacity",
    "overflow",
    "paint-order",
    "pointer-events",
    "shape-rendering",
    "stop-color",
    "stop-opacity",
    "stroke",
    "stroke-dasharray",
    "stroke-dashoffset",
    "stroke-linecap",
    "stroke-linejoin",
    "stroke-miterlimit",
    "stroke-opacity",
    "stroke-width",
    "text-anchor",
    "text-decoration",
    "text-rendering",
    "unicode-bidi",
    "vector-effect",
    "visibility",
    "word-spacing",
    "writing-mode",
];

/// The sets of element names and attribute keys that a validator accepts.
///
/// All operations are idempotent and never fail; removing a name that is not
/// present does nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Whitelist {
    elements: HashSet<String>,
    attributes: HashSet<String>,
}

impl Default for Whitelist {
    /// Creates a whitelist seeded from [`DEFAULT_ELEMENTS`] and [`DEFAULT_ATTRIBUTES`].
    fn default() -> Whitelist {
        let mut whitelist = Whitelist::empty();
        whitelist.add_elements(DEFAULT_ELEMENTS);
        whitelist.add_attributes(DEFAULT_ATTRIBUTES);
        whitelist
    }
}

impl Whitelist {
    /// Creates a whitelist that rejects everything.
    pub fn empty() -> Whitelist {
        Whitelist {
            elements: HashSet::new(),
            attributes: HashSet::new(),
        }
    }

    pub fn add_elements<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.elements
            .extend(names.into_iter().map(|n| fold_case(n.as_ref())));
    }

    pub fn remove_elements<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.elements.remove(&fold_case(name.as_ref()));
        }
    }

    pub fn add_attributes<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.attributes
            .extend(keys.into_iter().map(|k| fold_case(k.as_ref())));
    }

    pub fn remove_attributes<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for key in keys {
            self.attributes.remove(&fold_case(key.as_ref()));
        }
    }

    pub fn contains_element(&self, name: &str) -> bool {
        self.elements.contains(&fold_case(name))
    }

    pub fn contains_attribute(&self, key: &str) -> bool {
        self.attributes.contains(&fold_case(key))
    }
}

/// Lower-cases a name for storage and lookup.
pub(crate) fn fold_case(name: &str) -> String {
    name.to_lowercase()
}
