use std::fmt;

/// Target doses for one phototype, in mJ m-2
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoseThreshold {
    /// Biologically weighted dose synthesizing the daily vitamin D3 target
    pub vitamin_d: f64,
    /// Erythemally weighted dose producing a minimal sunburn
    pub erythema: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfRangeError {
    pub phototype: u8,
}

impl fmt::Display for OutOfRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "skin phototype index {} is out of range (expected 0-{})",
            self.phototype,
            DoseThresholdTable::PHOTOTYPES - 1
        )
    }
}

impl std::error::Error for OutOfRangeError {}

// Indexed by zero-based Fitzpatrick phototype (type I to type VI)
const VITAMIN_D_DOSES: [f64; 6] = [21000.9, 27000.35, 32000.825, 49000.25, 65000.7, 109000.45];
const ERYTHEMA_DOSES: [f64; 6] = [200000.0, 250000.0, 300000.0, 450000.0, 600000.0, 1000000.0];

pub struct DoseThresholdTable;

impl DoseThresholdTable {
    pub const PHOTOTYPES: u8 = 6;

    pub fn thresholds_for(phototype: u8) -> Result<DoseThreshold, OutOfRangeError> {
        let i = phototype as usize;
        match (VITAMIN_D_DOSES.get(i), ERYTHEMA_DOSES.get(i)) {
            (Some(&vitamin_d), Some(&erythema)) => Ok(DoseThreshold {
                vitamin_d,
                erythema,
            }),
            _ => Err(OutOfRangeError { phototype }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds_for_type_three() {
        let t = DoseThresholdTable::thresholds_for(2).unwrap();
        assert_eq!(t.vitamin_d, 32000.825);
        assert_eq!(t.erythema, 300000.0);
    }

    #[test]
    fn test_thresholds_increase_with_phototype() {
        let mut previous = DoseThresholdTable::thresholds_for(0).unwrap();
        for p in 1..DoseThresholdTable::PHOTOTYPES {
            let t = DoseThresholdTable::thresholds_for(p).unwrap();
            assert!(t.vitamin_d > previous.vitamin_d);
            assert!(t.erythema > previous.erythema);
            previous = t;
        }
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(
            DoseThresholdTable::thresholds_for(6),
            Err(OutOfRangeError { phototype: 6 })
        );
        let err = DoseThresholdTable::thresholds_for(255).unwrap_err();
        assert!(err.to_string().contains("255"));
    }
}
