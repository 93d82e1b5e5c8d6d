use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Neg, Sub};

/// Units in which a [`Length`] can be expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LengthUnit {
    Angstrom,
    Nanometer,
}

impl LengthUnit {
    /// Number of Angstroms in one unit.
    const fn angstroms_per_unit(self) -> f64 {
        match self {
            LengthUnit::Angstrom => 1.0,
            LengthUnit::Nanometer => 10.0,
        }
    }

    /// The area unit obtained by squaring this length unit.
    pub const fn squared(self) -> AreaUnit {
        match self {
            LengthUnit::Angstrom => AreaUnit::SquareAngstrom,
            LengthUnit::Nanometer => AreaUnit::SquareNanometer,
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            LengthUnit::Angstrom => "Å",
            LengthUnit::Nanometer => "nm",
        }
    }
}

/// Units in which an [`Area`] can be expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AreaUnit {
    SquareAngstrom,
    SquareNanometer,
}

impl AreaUnit {
    const fn square_angstroms_per_unit(self) -> f64 {
        match self {
            AreaUnit::SquareAngstrom => 1.0,
            AreaUnit::SquareNanometer => 100.0,
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            AreaUnit::SquareAngstrom => "Å²",
            AreaUnit::SquareNanometer => "nm²",
        }
    }
}

/// A length value tagged with its unit.
///
/// Comparisons and arithmetic between lengths expressed in different units are exact up to
/// floating-point rounding; the left-hand operand's unit is kept for arithmetic results.
#[derive(Debug, Clone, Copy)]
pub struct Length {
    value: f64,
    unit: LengthUnit,
}

impl Length {
    pub const fn new(value: f64, unit: LengthUnit) -> Self {
        Self { value, unit }
    }

    pub const fn angstroms(value: f64) -> Self {
        Self::new(value, LengthUnit::Angstrom)
    }

    pub const fn nanometers(value: f64) -> Self {
        Self::new(value, LengthUnit::Nanometer)
    }

    pub const fn zero(unit: LengthUnit) -> Self {
        Self::new(0.0, unit)
    }

    /// The raw magnitude in this length's own unit.
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> LengthUnit {
        self.unit
    }

    /// The magnitude expressed in `unit`.
    pub fn value_in(&self, unit: LengthUnit) -> f64 {
        if self.unit == unit {
            self.value
        } else {
            self.value * self.unit.angstroms_per_unit() / unit.angstroms_per_unit()
        }
    }

    /// Re-expresses this length in `unit`.
    pub fn to(&self, unit: LengthUnit) -> Self {
        Self::new(self.value_in(unit), unit)
    }

    pub fn squared(&self) -> Area {
        Area::new(self.value * self.value, self.unit.squared())
    }
}

impl PartialEq for Length {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value_in(self.unit)
    }
}

impl PartialOrd for Length {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value.partial_cmp(&other.value_in(self.unit))
    }
}

impl Add for Length {
    type Output = Length;

    fn add(self, rhs: Length) -> Length {
        Length::new(self.value + rhs.value_in(self.unit), self.unit)
    }
}

impl Sub for Length {
    type Output = Length;

    fn sub(self, rhs: Length) -> Length {
        Length::new(self.value - rhs.value_in(self.unit), self.unit)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit.symbol())
    }
}

/// An area value tagged with its unit.
#[derive(Debug, Clone, Copy)]
pub struct Area {
    value: f64,
    unit: AreaUnit,
}

impl Area {
    pub const fn new(value: f64, unit: AreaUnit) -> Self {
        Self { value, unit }
    }

    pub const fn square_angstroms(value: f64) -> Self {
        Self::new(value, AreaUnit::SquareAngstrom)
    }

    pub const fn square_nanometers(value: f64) -> Self {
        Self::new(value, AreaUnit::SquareNanometer)
    }

    pub const fn zero(unit: AreaUnit) -> Self {
        Self::new(0.0, unit)
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> AreaUnit {
        self.unit
    }

    pub fn value_in(&self, unit: AreaUnit) -> f64 {
        if self.unit == unit {
            self.value
        } else {
            self.value * self.unit.square_angstroms_per_unit() / unit.square_angstroms_per_unit()
        }
    }

    pub fn to(&self, unit: AreaUnit) -> Self {
        Self::new(self.value_in(unit), unit)
    }
}

impl PartialEq for Area {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value_in(self.unit)
    }
}

impl PartialOrd for Area {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value.partial_cmp(&other.value_in(self.unit))
    }
}

impl Add for Area {
    type Output = Area;

    fn add(self, rhs: Area) -> Area {
        Area::new(self.value + rhs.value_in(self.unit), self.unit)
    }
}

impl Sub for Area {
    type Output = Area;

    fn sub(self, rhs: Area) -> Area {
        Area::new(self.value - rhs.value_in(self.unit), self.unit)
    }
}

impl Neg for Area {
    type Output = Area;

    fn neg(self) -> Area {
        Area::new(-self.value, self.unit)
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit.symbol())
    }
}
