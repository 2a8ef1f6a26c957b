//! Technique registry: technique id byte to name and parameter layout.

use super::error::MprError;
use super::value::{Field, ScalarType};

use ScalarType::{F32, U8, U32};

/// Parameter layout of a technique.
#[derive(Debug, Clone, Copy)]
pub enum ParamLayout {
    Single(&'static [Field]),
    /// Alternative layouts told apart by field count; no two variants of one
    /// technique share a count.
    Variants(&'static [&'static [Field]]),
}

impl ParamLayout {
    /// Layout whose field count equals `count`.
    pub fn resolve(&self, count: usize) -> Option<&'static [Field]> {
        match *self {
            ParamLayout::Single(fields) => (fields.len() == count).then_some(fields),
            ParamLayout::Variants(variants) => {
                variants.iter().copied().find(|fields| fields.len() == count)
            }
        }
    }

    pub fn cardinalities(&self) -> Vec<usize> {
        match *self {
            ParamLayout::Single(fields) => vec![fields.len()],
            ParamLayout::Variants(variants) => variants.iter().map(|fields| fields.len()).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Technique {
    pub id: u8,
    pub name: &'static str,
    pub layout: ParamLayout,
}

pub fn lookup(id: u8) -> Result<&'static Technique, MprError> {
    TECHNIQUES
        .iter()
        .find(|technique| technique.id == id)
        .ok_or(MprError::UnknownTechnique { id })
}

pub fn all() -> &'static [Technique] {
    TECHNIQUES
}

static TECHNIQUES: &[Technique] = &[
    Technique {
        id: 0x04,
        name: "GCPL",
        layout: ParamLayout::Variants(&[GCPL, GCPL_LIMITS, GCPL_LIMITS_REST]),
    },
    Technique {
        id: 0x06,
        name: "CV",
        layout: ParamLayout::Single(CV),
    },
    Technique {
        id: 0x0b,
        name: "OCV",
        layout: ParamLayout::Single(OCV),
    },
    Technique {
        id: 0x18,
        name: "CA",
        layout: ParamLayout::Single(CA),
    },
    Technique {
        id: 0x19,
        name: "CP",
        layout: ParamLayout::Single(CP),
    },
    Technique {
        id: 0x1d,
        name: "PEIS",
        layout: ParamLayout::Single(PEIS),
    },
    Technique {
        id: 0x1e,
        name: "GEIS",
        layout: ParamLayout::Single(GEIS),
    },
    Technique {
        id: 0x32,
        name: "ZIR",
        layout: ParamLayout::Single(ZIR),
    },
    Technique {
        id: 0x6c,
        name: "LSV",
        layout: ParamLayout::Single(LSV),
    },
];

const OCV: &[Field] = &[
    ("tR", F32),
    ("dER/dt", F32),
    ("dER/dt unit", U8),
    ("record", U8),
    ("dER", F32),
    ("dtR", F32),
    ("E range min", F32),
    ("E range max", F32),
];

const CV: &[Field] = &[
    ("Ei", F32),
    ("Ei vs", U8),
    ("dE/dt", F32),
    ("dE/dt unit", U8),
    ("E1", F32),
    ("E1 vs", U8),
    ("step percent", U8),
    ("N", U32),
    ("E range min", F32),
    ("E range max", F32),
    ("I range", U8),
    ("bandwidth", U8),
    ("E2", F32),
    ("E2 vs", U8),
    ("nc cycles", U32),
    ("reverse scan", U8),
    ("Ef", F32),
    ("Ef vs", U8),
];

const CA: &[Field] = &[
    ("Ei", F32),
    ("Ei vs", U8),
    ("ti", F32),
    ("Imax", F32),
    ("Imax unit", U8),
    ("Imin", F32),
    ("Imin unit", U8),
    ("dQM", F32),
    ("dQM unit", U8),
    ("record", U8),
    ("dI", F32),
    ("dI unit", U8),
    ("dQ", F32),
    ("dQ unit", U8),
    ("dt", F32),
    ("dta", F32),
    ("E range min", F32),
    ("E range max", F32),
    ("I range", U8),
    ("bandwidth", U8),
    ("goto Ns", U32),
    ("nc cycles", U32),
];

const CP: &[Field] = &[
    ("Is", F32),
    ("Is unit", U8),
    ("Is vs", U8),
    ("ts", F32),
    ("EM", F32),
    ("dQM", F32),
    ("dQM unit", U8),
    ("record", U8),
    ("dEs", F32),
    ("dts", F32),
    ("E range min", F32),
    ("E range max", F32),
    ("I range", U8),
    ("bandwidth", U8),
    ("goto Ns", U32),
    ("nc cycles", U32),
];

const GCPL: &[Field] = &[
    ("set I/C", U8),
    ("Is", F32),
    ("Is unit", U8),
    ("Is vs", U8),
    ("N", F32),
    ("I sign", U8),
    ("t1", F32),
    ("I range", U8),
    ("bandwidth", U8),
    ("dE1", F32),
    ("dt1", F32),
    ("EM", F32),
    ("tM", F32),
    ("Im", F32),
    ("Im unit", U8),
    ("dI/dt", F32),
    ("dI/dt unit", U8),
    ("E range min", F32),
    ("E range max", F32),
    ("dq", F32),
    ("dq unit", U8),
    ("dtq", F32),
    ("dQM", F32),
    ("dQM unit", U8),
    ("dxM", F32),
    ("delta SoC", F32),
    ("tR", F32),
    ("dER/dt", F32),
    ("dER", F32),
    ("dtR", F32),
    ("EL", F32),
    ("goto Ns", U32),
    ("nc cycles", U32),
];

const GCPL_LIMITS: &[Field] = &[
    ("set I/C", U8),
    ("Is", F32),
    ("Is unit", U8),
    ("Is vs", U8),
    ("N", F32),
    ("I sign", U8),
    ("t1", F32),
    ("I range", U8),
    ("bandwidth", U8),
    ("dE1", F32),
    ("dt1", F32),
    ("EM", F32),
    ("tM", F32),
    ("Im", F32),
    ("Im unit", U8),
    ("dI/dt", F32),
    ("dI/dt unit", U8),
    ("E range min", F32),
    ("E range max", F32),
    ("dq", F32),
    ("dq unit", U8),
    ("dtq", F32),
    ("dQM", F32),
    ("dQM unit", U8),
    ("dxM", F32),
    ("delta SoC", F32),
    ("tR", F32),
    ("dER/dt", F32),
    ("dER", F32),
    ("dtR", F32),
    ("EL", F32),
    ("goto Ns", U32),
    ("nc cycles", U32),
    ("Emax", F32),
    ("Emin", F32),
];

const GCPL_LIMITS_REST: &[Field] = &[
    ("set I/C", U8),
    ("Is", F32),
    ("Is unit", U8),
    ("Is vs", U8),
    ("N", F32),
    ("I sign", U8),
    ("t1", F32),
    ("I range", U8),
    ("bandwidth", U8),
    ("dE1", F32),
    ("dt1", F32),
    ("EM", F32),
    ("tM", F32),
    ("Im", F32),
    ("Im unit", U8),
    ("dI/dt", F32),
    ("dI/dt unit", U8),
    ("E range min", F32),
    ("E range max", F32),
    ("dq", F32),
    ("dq unit", U8),
    ("dtq", F32),
    ("dQM", F32),
    ("dQM unit", U8),
    ("dxM", F32),
    ("delta SoC", F32),
    ("tR", F32),
    ("dER/dt", F32),
    ("dER", F32),
    ("dtR", F32),
    ("EL", F32),
    ("goto Ns", U32),
    ("nc cycles", U32),
    ("Emax", F32),
    ("Emin", F32),
    ("rest tR", F32),
    ("rest dER/dt", F32),
    ("rest dER/dt unit", U8),
];

const PEIS: &[Field] = &[
    ("E", F32),
    ("E vs", U8),
    ("tE", F32),
    ("record", U8),
    ("dI", F32),
    ("dI unit", U8),
    ("dt", F32),
    ("fi", F32),
    ("fi unit", U8),
    ("ff", F32),
    ("ff unit", U8),
    ("Nd", U32),
    ("points", U8),
    ("spacing", U8),
    ("Va", F32),
    ("Va unit", U8),
    ("pw", F32),
    ("Na", U32),
    ("corr", U8),
    ("E range min", F32),
    ("E range max", F32),
    ("I range", U8),
    ("bandwidth", U8),
];

const GEIS: &[Field] = &[
    ("Is", F32),
    ("Is unit", U8),
    ("Is vs", U8),
    ("tIs", F32),
    ("record", U8),
    ("dE", F32),
    ("dt", F32),
    ("fi", F32),
    ("fi unit", U8),
    ("ff", F32),
    ("ff unit", U8),
    ("Nd", U32),
    ("points", U8),
    ("spacing", U8),
    ("Ia", F32),
    ("Ia unit", U8),
    ("pw", F32),
    ("Na", U32),
    ("corr", U8),
    ("E range min", F32),
    ("E range max", F32),
    ("I range", U8),
    ("bandwidth", U8),
];

const ZIR: &[Field] = &[
    ("E", F32),
    ("E vs", U8),
    ("Va", F32),
    ("Va unit", U8),
    ("f", F32),
    ("f unit", U8),
    ("Na", U32),
    ("E range min", F32),
    ("E range max", F32),
    ("I range", U8),
    ("bandwidth", U8),
];

const LSV: &[Field] = &[
    ("tR", F32),
    ("dER/dt", F32),
    ("dER/dt unit", U8),
    ("dER", F32),
    ("dtR", F32),
    ("Ei", F32),
    ("Ei vs", U8),
    ("dE/dt", F32),
    ("dE/dt unit", U8),
    ("Ef", F32),
    ("Ef vs", U8),
    ("step percent", U8),
    ("N", U32),
    ("E range min", F32),
    ("E range max", F32),
    ("I range", U8),
    ("bandwidth", U8),
];

#[cfg(test)]
mod tests {
    use super::{ParamLayout, all, lookup};
    use crate::mpr::error::MprError;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique() {
        let ids: HashSet<u8> = all().iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), all().len());
    }

    #[test]
    fn variant_counts_are_distinct_within_a_technique() {
        for technique in all() {
            let counts = technique.layout.cardinalities();
            let unique: HashSet<usize> = counts.iter().copied().collect();
            assert_eq!(unique.len(), counts.len(), "{}", technique.name);
        }
    }

    #[test]
    fn field_names_are_unique_within_a_layout() {
        for technique in all() {
            let layouts: Vec<_> = match technique.layout {
                ParamLayout::Single(fields) => vec![fields],
                ParamLayout::Variants(variants) => variants.to_vec(),
            };
            for fields in layouts {
                let names: HashSet<&str> = fields.iter().map(|(name, _)| *name).collect();
                assert_eq!(names.len(), fields.len(), "{}", technique.name);
            }
        }
    }

    #[test]
    fn resolves_variant_by_count() {
        let gcpl = lookup(0x04).unwrap();
        assert_eq!(gcpl.name, "GCPL");
        assert_eq!(gcpl.layout.resolve(35).map(<[_]>::len), Some(35));
        assert_eq!(gcpl.layout.resolve(33).map(<[_]>::len), Some(33));
        assert!(gcpl.layout.resolve(34).is_none());

        let ocv = lookup(0x0b).unwrap();
        assert_eq!(ocv.layout.cardinalities(), vec![8]);
        assert!(ocv.layout.resolve(9).is_none());
    }

    #[test]
    fn unknown_id_fails() {
        assert!(matches!(
            lookup(0xee),
            Err(MprError::UnknownTechnique { id: 0xee })
        ));
    }
}
