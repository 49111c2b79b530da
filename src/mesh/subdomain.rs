use super::Mesh;
use std::f64::consts::PI;

/// Parameters describing a regular decomposition of a global mesh
#[derive(Debug, Clone, PartialEq)]
pub struct SubdomainConfig {
    /// global number of interior x points
    pub nx: usize,
    /// global number of interior y points
    pub ny: usize,
    /// number of points in z on every processor
    pub nz: usize,
    /// x guard cell width
    pub mxg: usize,
    /// y guard cell width
    pub myg: usize,
    /// number of processors in x
    pub nxpe: usize,
    /// number of processors in y
    pub nype: usize,
    /// x index of this processor in the processor grid
    pub pe_x: usize,
    /// y index of this processor in the processor grid
    pub pe_y: usize,
    pub double_null: bool,
    /// branch cut of a double-null mesh, as a global interior y index
    pub ny_inner: usize,
    /// length of the periodic coordinate covered by the domain
    pub zlength: f64,
}

impl SubdomainConfig {
    /// single processor, single-null decomposition covering a full period in z
    pub fn serial(nx: usize, ny: usize, nz: usize, mxg: usize, myg: usize) -> Self {
        Self {
            nx,
            ny,
            nz,
            mxg,
            myg,
            nxpe: 1,
            nype: 1,
            pe_x: 0,
            pe_y: 0,
            double_null: false,
            ny_inner: 0,
            zlength: 2. * PI,
        }
    }

    /// place this configuration on processor `(pe_x, pe_y)` of an `nxpe × nype` grid
    pub fn on_processor(mut self, nxpe: usize, nype: usize, pe_x: usize, pe_y: usize) -> Self {
        self.nxpe = nxpe;
        self.nype = nype;
        self.pe_x = pe_x;
        self.pe_y = pe_y;
        self
    }

    /// make the mesh double-null with the branch cut at `ny_inner`
    pub fn with_double_null(mut self, ny_inner: usize) -> Self {
        self.double_null = true;
        self.ny_inner = ny_inner;
        self
    }

    /// set the length of the periodic coordinate, e.g. `2π / 5` for a fifth of a torus
    pub fn with_zlength(mut self, zlength: f64) -> Self {
        self.zlength = zlength;
        self
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DecompositionError {
    #[error("{axis} interior extent {n} cannot be split evenly between {npe} processors")]
    Indivisible { axis: char, n: usize, npe: usize },
    #[error("processor index {index} is out of range for {npe} processors in {axis}")]
    ProcessorIndex { axis: char, index: usize, npe: usize },
    #[error("double-null branch cut ny_inner={ny_inner} must lie strictly inside ny={ny} on a processor boundary (multiple of {mysub})")]
    BranchCut {
        ny_inner: usize,
        ny: usize,
        mysub: usize,
    },
    #[error("length of the periodic coordinate must be positive and finite, got {0}")]
    ZLength(f64),
    #[error("the local z extent must contain at least one point")]
    EmptyZ,
}

/// The portion of a regularly decomposed mesh owned by one processor
#[derive(Debug, Clone, PartialEq)]
pub struct Subdomain {
    config: SubdomainConfig,
    mxsub: usize,
    mysub: usize,
}

impl Subdomain {
    /// Validate a decomposition and compute the local extents of this processor
    pub fn new(config: SubdomainConfig) -> Result<Self, DecompositionError> {
        let SubdomainConfig {
            nx,
            ny,
            nz,
            nxpe,
            nype,
            pe_x,
            pe_y,
            ..
        } = config;

        if nx == 0 || nxpe == 0 || nx % nxpe != 0 {
            return Err(DecompositionError::Indivisible {
                axis: 'x',
                n: nx,
                npe: nxpe,
            });
        }

        if ny == 0 || nype == 0 || ny % nype != 0 {
            return Err(DecompositionError::Indivisible {
                axis: 'y',
                n: ny,
                npe: nype,
            });
        }

        if pe_x >= nxpe {
            return Err(DecompositionError::ProcessorIndex {
                axis: 'x',
                index: pe_x,
                npe: nxpe,
            });
        }

        if pe_y >= nype {
            return Err(DecompositionError::ProcessorIndex {
                axis: 'y',
                index: pe_y,
                npe: nype,
            });
        }

        if nz == 0 {
            return Err(DecompositionError::EmptyZ);
        }

        if !(config.zlength.is_finite() && config.zlength > 0.) {
            return Err(DecompositionError::ZLength(config.zlength));
        }

        let mxsub = nx / nxpe;
        let mysub = ny / nype;

        if config.double_null
            && (config.ny_inner == 0 || config.ny_inner >= ny || config.ny_inner % mysub != 0)
        {
            return Err(DecompositionError::BranchCut {
                ny_inner: config.ny_inner,
                ny,
                mysub,
            });
        }

        Ok(Self {
            config,
            mxsub,
            mysub,
        })
    }

    pub fn config(&self) -> &SubdomainConfig {
        &self.config
    }
}

impl Mesh for Subdomain {
    fn global_nx(&self) -> usize {
        self.config.nx + 2 * self.config.mxg
    }

    fn global_ny(&self) -> usize {
        self.config.ny + 2 * self.config.myg
    }

    fn local_nx(&self) -> usize {
        self.mxsub + 2 * self.config.mxg
    }

    fn local_ny(&self) -> usize {
        self.mysub + 2 * self.config.myg
    }

    fn local_nz(&self) -> usize {
        self.config.nz
    }

    fn xstart(&self) -> usize {
        self.config.mxg
    }

    fn xend(&self) -> usize {
        self.config.mxg + self.mxsub - 1
    }

    fn ystart(&self) -> usize {
        self.config.myg
    }

    fn yend(&self) -> usize {
        self.config.myg + self.mysub - 1
    }

    fn offset_x(&self) -> usize {
        self.config.pe_x * self.mxsub
    }

    fn offset_y(&self) -> usize {
        self.config.pe_y * self.mysub
    }

    fn is_double_null(&self) -> bool {
        self.config.double_null
    }

    fn ny_inner(&self) -> usize {
        self.config.ny_inner
    }

    fn zlength(&self) -> f64 {
        self.config.zlength
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_extents_and_offsets() {
        let config = SubdomainConfig::serial(8, 12, 4, 2, 1).on_processor(2, 3, 1, 2);
        let mesh = Subdomain::new(config).unwrap();

        assert_eq!(mesh.global_nx(), 12);
        assert_eq!(mesh.global_ny(), 14);
        assert_eq!(mesh.local_nx(), 8);
        assert_eq!(mesh.local_ny(), 6);
        assert_eq!((mesh.xstart(), mesh.xend()), (2, 5));
        assert_eq!((mesh.ystart(), mesh.yend()), (1, 4));
        assert_eq!(mesh.offset_x(), 4);
        assert_eq!(mesh.offset_y(), 8);
        assert_eq!(mesh.x_guard_width().unwrap(), 2);
        assert_eq!(mesh.y_guard_width().unwrap(), 1);
    }

    #[test]
    fn uneven_split_is_rejected() {
        let config = SubdomainConfig::serial(7, 12, 4, 2, 1).on_processor(2, 1, 0, 0);
        assert_eq!(
            Subdomain::new(config),
            Err(DecompositionError::Indivisible {
                axis: 'x',
                n: 7,
                npe: 2
            })
        );
    }

    #[test]
    fn branch_cut_must_fall_on_processor_boundary() {
        let config = SubdomainConfig::serial(4, 16, 1, 1, 2)
            .on_processor(1, 4, 0, 0)
            .with_double_null(6);

        assert!(matches!(
            Subdomain::new(config),
            Err(DecompositionError::BranchCut { .. })
        ));

        let config = SubdomainConfig::serial(4, 16, 1, 1, 2)
            .on_processor(1, 4, 0, 0)
            .with_double_null(8);

        assert!(Subdomain::new(config).unwrap().is_double_null());
    }
}
