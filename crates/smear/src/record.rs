use serde::Serialize;

/// The six smeared variables, in file column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    Energy,
    X,
    Y,
    Z,
    XPrime,
    YPrime,
}

impl Component {
    pub const ALL: [Component; 6] = [
        Component::Energy,
        Component::X,
        Component::Y,
        Component::Z,
        Component::XPrime,
        Component::YPrime,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Component::Energy => "E (GeV)",
            Component::X => "x (um)",
            Component::Y => "y (um)",
            Component::Z => "z (um)",
            Component::XPrime => "x' (urad)",
            Component::YPrime => "y' (urad)",
        }
    }
}

/// One macroparticle: energy in GeV, positions in microns, angles in
/// micro-radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParticleRecord {
    pub energy: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub x_prime: f64,
    pub y_prime: f64,
}

impl ParticleRecord {
    pub fn from_array(values: [f64; 6]) -> Self {
        let [energy, x, y, z, x_prime, y_prime] = values;
        Self {
            energy,
            x,
            y,
            z,
            x_prime,
            y_prime,
        }
    }

    pub fn to_array(&self) -> [f64; 6] {
        [self.energy, self.x, self.y, self.z, self.x_prime, self.y_prime]
    }

    pub fn get(&self, component: Component) -> f64 {
        self.to_array()[component.index()]
    }
}
